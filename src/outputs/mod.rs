//! Output Reader
//!
//! Resolves named outputs from already-applied infrastructure state. Three
//! backends implement [`OutputSource`]:
//!
//! - [`TerraformCli`] invokes `terraform output` (or a compatible binary)
//! - [`StateFile`] reads `terraform.tfstate` directly
//! - [`StaticOutputs`] holds values in memory
//!
//! All backends are read-only.

mod error;
mod source;
mod state;
mod terraform;
mod value;

use std::path::Path;

pub use error::OutputError;
pub use source::{get_required_output, OutputSource, StaticOutputs};
pub use state::{StateFile, DEFAULT_STATE_FILE, SUPPORTED_STATE_VERSION};
pub use terraform::{TerraformCli, DEFAULT_BINARY, DEFAULT_COMMAND_TIMEOUT};
pub use value::{parse_outputs_document, OutputValue, REDACTED};

/// Fetch a required output from the configuration at `dir` using the default tool.
pub fn terraform_output_required(dir: &Path, key: &str) -> Result<OutputValue, OutputError> {
    get_required_output(&TerraformCli::new(dir), key)
}
