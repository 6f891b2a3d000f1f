//! Output values and conversion from the tool's JSON representation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::error::OutputError;

/// Placeholder shown instead of a sensitive value
pub const REDACTED: &str = "(sensitive)";

/// A resolved output value from applied state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputValue {
    value: String,
    /// Whether the tool marked this output as sensitive
    pub sensitive: bool,
}

impl OutputValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn sensitive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            sensitive: true,
        }
    }

    /// Convert a JSON value as emitted by `output -json`.
    ///
    /// Strings are taken verbatim, scalars use their canonical text and
    /// collections are rendered as compact JSON. `null` has no value and
    /// yields `None`.
    pub fn from_json(value: &Value, sensitive: bool) -> Option<Self> {
        let text = match value {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => value.to_string(),
        };
        Some(Self {
            value: text,
            sensitive,
        })
    }

    /// The raw value, regardless of sensitivity
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Text safe for terminals and logs
    pub fn display_value(&self) -> &str {
        if self.sensitive {
            REDACTED
        } else {
            &self.value
        }
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_value())
    }
}

/// One entry of an outputs document (`output -json` or the state `outputs` block)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OutputEntry {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub sensitive: bool,
}

impl OutputEntry {
    pub fn resolve(&self) -> Option<OutputValue> {
        OutputValue::from_json(&self.value, self.sensitive)
    }
}

/// Resolve a parsed map of output entries, dropping entries with no value.
pub(crate) fn resolve_entries(entries: BTreeMap<String, OutputEntry>) -> BTreeMap<String, OutputValue> {
    entries
        .into_iter()
        .filter_map(|(key, entry)| entry.resolve().map(|value| (key, value)))
        .collect()
}

/// Parse the document printed by `output -json` with no key argument.
pub fn parse_outputs_document(json: &str) -> Result<BTreeMap<String, OutputValue>, OutputError> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(BTreeMap::new());
    }
    let entries: BTreeMap<String, OutputEntry> =
        serde_json::from_str(trimmed).map_err(|e| OutputError::parse("outputs document", e))?;
    Ok(resolve_entries(entries))
}
