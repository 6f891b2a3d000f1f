use anyhow::{Context, Result};
use colored::Colorize;

use crate::verify::ALL_UNITS;

/// List verification units and the outputs each one requires
pub fn execute(json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(ALL_UNITS).context("Failed to serialize units")?;
        println!("{rendered}");
        return Ok(());
    }

    for unit in ALL_UNITS {
        println!(
            "{} {} {}",
            unit.id.bold(),
            format!("({})", unit.test_name).dimmed(),
            unit.description
        );
        let width = unit.outputs.iter().map(|r| r.key.len()).max().unwrap_or(0);
        for required in unit.outputs {
            println!(
                "    {} {:<width$}  {}",
                "·".dimmed(),
                required.key,
                required.message.dimmed()
            );
        }
    }
    Ok(())
}
