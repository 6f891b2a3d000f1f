//! Human-readable rendering of verification results

use colored::Colorize;
use std::fmt::Write;

use super::result::{SuiteReport, UnitOutcome, UnitReport};

/// Render a single unit as an indented block
pub fn format_unit(report: &UnitReport) -> String {
    let mut out = String::new();

    let marker = if report.outcome.passed() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    let _ = writeln!(
        out,
        "{} {} {}",
        marker,
        report.test_name.bold(),
        format!("({}ms)", report.duration.as_millis()).dimmed()
    );

    match &report.outcome {
        UnitOutcome::Passed { checks } | UnitOutcome::Failed { checks, .. } => {
            for check in checks {
                let status = if check.passed {
                    "✓".green()
                } else {
                    "✗".red()
                };
                if check.passed {
                    let _ = writeln!(out, "    {} {}", status, check.key);
                } else {
                    let _ = writeln!(out, "    {} {}: {}", status, check.key, check.message);
                }
            }
        }
        UnitOutcome::Aborted { key, reason } => {
            let label = match key {
                Some(key) => format!("missing output '{key}'"),
                None => "output unavailable".to_string(),
            };
            let _ = writeln!(out, "    {} {}", "→".yellow(), label);
            let _ = writeln!(out, "      {}", reason.dimmed());
        }
    }

    out
}

/// Render every unit followed by a summary line
pub fn format_suite(suite: &SuiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Verifying outputs from {}\n",
        "→".cyan().bold(),
        suite.source
    );

    for unit in &suite.units {
        out.push_str(&format_unit(unit));
    }

    out.push('\n');
    if suite.all_passed() {
        let _ = writeln!(
            out,
            "{} All {} unit(s) passed",
            "✓".green().bold(),
            suite.units.len()
        );
    } else {
        let _ = writeln!(
            out,
            "{} {} passed, {} failed",
            "Summary:".bold(),
            suite.passed_count(),
            suite.failed_count()
        );
    }

    out
}
