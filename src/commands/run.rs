use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::{ConfigOverrides, VerifyConfig};
use crate::verify::report::format_suite;
use crate::verify::{run_units, select_units};

/// Run verification units against applied infrastructure
/// Usage: infra-verify run [UNIT...] [--dir <dir>] [--state [<path>]] [--json]
pub fn execute(
    units: Vec<String>,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    json: bool,
) -> Result<()> {
    let config = VerifyConfig::resolve(config_path, overrides)?;
    let selected = select_units(&units)?;
    let source = config.build_source();

    let suite = run_units(&selected, source.as_ref());

    if json {
        let rendered =
            serde_json::to_string_pretty(&suite).context("Failed to serialize report")?;
        println!("{rendered}");
    } else {
        print!("{}", format_suite(&suite));
    }

    if !suite.all_passed() {
        bail!(
            "{} of {} verification unit(s) failed",
            suite.failed_count(),
            suite.units.len()
        );
    }
    Ok(())
}
