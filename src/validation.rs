//! Input validation for output keys supplied on the command line.
//!
//! Keys are passed as arguments to the infrastructure tool, so anything that
//! is not a plain identifier is rejected before a process is spawned.

use anyhow::{bail, Result};

/// Maximum allowed length for an output key.
pub const MAX_KEY_LENGTH: usize = 128;

/// Validates that an output key is a well-formed identifier.
///
/// A key is valid if:
/// - It is not empty
/// - It is no longer than MAX_KEY_LENGTH characters
/// - It contains only ASCII alphanumerics, underscores, and dashes
/// - It does not start with a digit or a dash
///
/// # Examples
///
/// ```
/// use infra_verify::validation::validate_output_key;
///
/// assert!(validate_output_key("cloud_run_url").is_ok());
/// assert!(validate_output_key("-json").is_err());
/// assert!(validate_output_key("").is_err());
/// ```
pub fn validate_output_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Output key cannot be empty");
    }

    if key.len() > MAX_KEY_LENGTH {
        bail!(
            "Output key too long: {} characters (max {})",
            key.len(),
            MAX_KEY_LENGTH
        );
    }

    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_chars {
        bail!("Output key '{key}' contains invalid characters. Use only alphanumeric characters, underscores (_), and dashes (-)");
    }

    if key.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        bail!("Output key '{key}' must start with a letter or underscore");
    }

    Ok(())
}

/// Clap value parser for output key arguments.
pub fn clap_output_key_validator(s: &str) -> Result<String, String> {
    validate_output_key(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
