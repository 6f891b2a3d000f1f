//! Executes verification units against an output source

use chrono::Utc;
use std::thread;
use std::time::Instant;

use super::assert::Checker;
use super::result::{SuiteReport, UnitOutcome, UnitReport};
use super::units::VerificationUnit;
use crate::outputs::{get_required_output, OutputSource, OutputValue};

/// Run one unit.
///
/// Every required output is fetched first, sequentially. The first output
/// that cannot be read aborts the unit before any assertion is evaluated.
/// Once all outputs are in hand each one is asserted non-empty; a failed
/// assertion does not stop the remaining ones.
pub fn run_unit(unit: &VerificationUnit, source: &dyn OutputSource) -> UnitOutcome {
    let mut values: Vec<OutputValue> = Vec::with_capacity(unit.outputs.len());

    for required in unit.outputs {
        match get_required_output(source, required.key) {
            Ok(value) => values.push(value),
            Err(err) => {
                tracing::warn!(unit = unit.id, key = required.key, error = %err, "unit aborted");
                return UnitOutcome::Aborted {
                    key: err.missing_key().map(str::to_string),
                    reason: err.to_string(),
                };
            }
        }
    }

    let mut checker = Checker::new();
    for (required, value) in unit.outputs.iter().zip(&values) {
        checker.assert_non_empty(required.key, value.as_str(), required.message);
    }

    let failures = checker.failures();
    let checks = checker.into_results();
    if failures.is_empty() {
        UnitOutcome::Passed { checks }
    } else {
        UnitOutcome::Failed { checks, failures }
    }
}

/// Run one unit and time it
pub fn run_unit_report(unit: &VerificationUnit, source: &dyn OutputSource) -> UnitReport {
    tracing::info!(unit = unit.id, "running verification unit");
    let start = Instant::now();
    let outcome = run_unit(unit, source);
    let duration = start.elapsed();
    tracing::info!(
        unit = unit.id,
        status = outcome.label(),
        duration_ms = duration.as_millis() as u64,
        "verification unit finished"
    );

    UnitReport {
        unit: unit.id,
        test_name: unit.test_name,
        outcome,
        duration,
    }
}

/// Run units concurrently against a shared source.
///
/// Units share nothing but the read-only source. Reports come back in the
/// order the units were given, regardless of completion order.
pub fn run_units(units: &[&VerificationUnit], source: &dyn OutputSource) -> SuiteReport {
    let reports: Vec<UnitReport> = thread::scope(|scope| {
        let handles: Vec<_> = units
            .iter()
            .map(|unit| (unit, scope.spawn(move || run_unit_report(unit, source))))
            .collect();

        handles
            .into_iter()
            .map(|(unit, handle)| {
                handle.join().unwrap_or_else(|_| UnitReport {
                    unit: unit.id,
                    test_name: unit.test_name,
                    outcome: UnitOutcome::Aborted {
                        key: None,
                        reason: format!("verification unit '{}' panicked", unit.id),
                    },
                    duration: Default::default(),
                })
            })
            .collect()
    });

    SuiteReport {
        generated_at: Utc::now(),
        source: source.describe(),
        units: reports,
    }
}

/// Panic with every failure message unless the unit passes.
///
/// Intended for `#[test]` entry points: a missing output reports the key,
/// failed assertions are reported together.
pub fn assert_unit_passes(unit: &VerificationUnit, source: &dyn OutputSource) {
    match run_unit(unit, source) {
        UnitOutcome::Passed { .. } => {}
        UnitOutcome::Failed { failures, .. } => {
            panic!("{} failed:\n  {}", unit.test_name, failures.join("\n  "));
        }
        UnitOutcome::Aborted { reason, .. } => {
            panic!("{} aborted: {reason}", unit.test_name);
        }
    }
}
