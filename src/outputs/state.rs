//! Direct reader for the applied-state record (`terraform.tfstate`)

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::OutputError;
use super::source::OutputSource;
use super::value::{resolve_entries, OutputEntry, OutputValue};

/// Default state file name inside a configuration directory
pub const DEFAULT_STATE_FILE: &str = "terraform.tfstate";

/// The only state format version understood
pub const SUPPORTED_STATE_VERSION: u64 = 4;

#[derive(Debug, Deserialize)]
struct StateDocument {
    version: u64,
    #[serde(default)]
    terraform_version: Option<String>,
    #[serde(default)]
    outputs: BTreeMap<String, OutputEntry>,
}

/// Reads outputs straight from a local state file.
///
/// The file is re-read on every call so that concurrent units always see the
/// state as it is on disk; nothing is written back.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// State file at its default location inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, OutputValue>, OutputError> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                OutputError::StateNotFound {
                    path: self.path.clone(),
                }
            } else {
                OutputError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let context = self.path.display().to_string();
        let doc: StateDocument =
            serde_json::from_str(&content).map_err(|e| OutputError::parse(&context, e))?;

        if doc.version != SUPPORTED_STATE_VERSION {
            return Err(OutputError::parse(
                context,
                format!(
                    "unsupported state version {} (expected {SUPPORTED_STATE_VERSION})",
                    doc.version
                ),
            ));
        }

        tracing::debug!(
            path = %self.path.display(),
            terraform_version = doc.terraform_version.as_deref().unwrap_or("unknown"),
            outputs = doc.outputs.len(),
            "loaded state file"
        );

        Ok(resolve_entries(doc.outputs))
    }
}

impl OutputSource for StateFile {
    fn describe(&self) -> String {
        format!("state file {}", self.path.display())
    }

    fn fetch(&self, key: &str) -> Result<Option<OutputValue>, OutputError> {
        Ok(self.load()?.remove(key))
    }

    fn list(&self) -> Result<BTreeMap<String, OutputValue>, OutputError> {
        self.load()
    }
}
