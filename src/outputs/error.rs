//! Error types for output retrieval

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading outputs from applied infrastructure state.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The key has no value in applied state.
    #[error("required output '{key}' is missing from applied state")]
    Missing { key: String },

    /// The infrastructure tool could not be located on PATH.
    #[error("infrastructure tool '{binary}' not found on PATH")]
    BinaryNotFound { binary: String },

    /// The tool process could not be started.
    #[error("failed to execute: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool did not finish within the configured timeout and was killed.
    #[error("command '{command}' timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// The tool exited with a non-zero status for a reason other than a missing output.
    #[error("command '{command}' failed with exit code {exit_code:?}: {stderr}")]
    Command {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The applied-state record does not exist.
    #[error("state file not found: {}", .path.display())]
    StateNotFound { path: PathBuf },

    /// The state file exists but reading it failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tool output or state content could not be understood.
    #[error("failed to parse {context}: {message}")]
    Parse { context: String, message: String },
}

impl OutputError {
    /// The missing key, if this error is a missing-output error.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            OutputError::Missing { key } => Some(key),
            _ => None,
        }
    }

    pub(crate) fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        OutputError::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
