use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::{ConfigOverrides, VerifyConfig};
use crate::outputs::get_required_output;

/// Print a single required output
pub fn show(
    key: &str,
    show_sensitive: bool,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<()> {
    let config = VerifyConfig::resolve(config_path, overrides)?;
    let source = config.build_source();

    let value = get_required_output(source.as_ref(), key)
        .with_context(|| format!("Failed to read output '{key}' from {}", source.describe()))?;

    if show_sensitive {
        println!("{}", value.as_str());
    } else {
        println!("{value}");
    }
    Ok(())
}

/// List every output the configured source exposes
pub fn list(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<()> {
    let config = VerifyConfig::resolve(config_path, overrides)?;
    let source = config.build_source();

    let outputs = source
        .list()
        .with_context(|| format!("Failed to list outputs from {}", source.describe()))?;

    if outputs.is_empty() {
        println!("{} No outputs found in {}", "−".dimmed(), source.describe());
        return Ok(());
    }

    let width = outputs.keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, value) in &outputs {
        let rendered = if value.sensitive {
            value.display_value().dimmed().to_string()
        } else if value.is_empty() {
            "\"\"".yellow().to_string()
        } else {
            value.as_str().to_string()
        };
        println!("{key:<width$}  {rendered}");
    }
    Ok(())
}
