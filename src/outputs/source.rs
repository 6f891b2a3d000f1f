//! Output source abstraction and the required-output lookup

use std::collections::BTreeMap;

use super::error::OutputError;
use super::value::OutputValue;

/// Something that can resolve output keys against applied infrastructure state.
///
/// Sources are shared by concurrently running verification units, so
/// implementations must be `Send + Sync` and must not mutate external state.
pub trait OutputSource: Send + Sync {
    /// Short description used in logs and reports (e.g. `terraform @ ../`)
    fn describe(&self) -> String;

    /// Fetch a single output. `Ok(None)` means the key is not present.
    fn fetch(&self, key: &str) -> Result<Option<OutputValue>, OutputError>;

    /// All outputs the source exposes
    fn list(&self) -> Result<BTreeMap<String, OutputValue>, OutputError>;
}

/// Fetch an output that must exist.
///
/// An unresolved key becomes [`OutputError::Missing`]; other reader errors
/// pass through unchanged.
pub fn get_required_output(source: &dyn OutputSource, key: &str) -> Result<OutputValue, OutputError> {
    tracing::debug!(key, source = %source.describe(), "fetching required output");
    source.fetch(key)?.ok_or_else(|| OutputError::Missing {
        key: key.to_string(),
    })
}

/// In-memory outputs
#[derive(Debug, Clone, Default)]
pub struct StaticOutputs {
    outputs: BTreeMap<String, OutputValue>,
}

impl StaticOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a non-sensitive string output
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, OutputValue::new(value));
        self
    }

    pub fn insert(&mut self, key: &str, value: OutputValue) {
        self.outputs.insert(key.to_string(), value);
    }
}

impl FromIterator<(String, OutputValue)> for StaticOutputs {
    fn from_iter<I: IntoIterator<Item = (String, OutputValue)>>(iter: I) -> Self {
        Self {
            outputs: iter.into_iter().collect(),
        }
    }
}

impl OutputSource for StaticOutputs {
    fn describe(&self) -> String {
        format!("static ({} outputs)", self.outputs.len())
    }

    fn fetch(&self, key: &str) -> Result<Option<OutputValue>, OutputError> {
        Ok(self.outputs.get(key).cloned())
    }

    fn list(&self) -> Result<BTreeMap<String, OutputValue>, OutputError> {
        Ok(self.outputs.clone())
    }
}
