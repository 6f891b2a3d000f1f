//! Result types for verification runs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::assert::AssertionResult;

/// Outcome of running a single verification unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// Every required output resolved and was non-empty
    Passed { checks: Vec<AssertionResult> },
    /// All outputs resolved but at least one assertion failed
    Failed {
        checks: Vec<AssertionResult>,
        failures: Vec<String>,
    },
    /// An output could not be read; no assertions were evaluated
    Aborted {
        /// Set when the abort was caused by a missing key
        key: Option<String>,
        reason: String,
    },
}

impl UnitOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, UnitOutcome::Passed { .. })
    }

    pub fn checks(&self) -> &[AssertionResult] {
        match self {
            UnitOutcome::Passed { checks } | UnitOutcome::Failed { checks, .. } => checks.as_slice(),
            UnitOutcome::Aborted { .. } => &[],
        }
    }

    /// Every failure message for this unit
    pub fn failures(&self) -> Vec<String> {
        match self {
            UnitOutcome::Passed { .. } => Vec::new(),
            UnitOutcome::Failed { failures, .. } => failures.clone(),
            UnitOutcome::Aborted { reason, .. } => vec![reason.clone()],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitOutcome::Passed { .. } => "PASSED",
            UnitOutcome::Failed { .. } => "FAILED",
            UnitOutcome::Aborted { .. } => "ABORTED",
        }
    }
}

/// Result of one unit within a run
#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub unit: &'static str,
    pub test_name: &'static str,
    pub outcome: UnitOutcome,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl UnitReport {
    pub fn summary(&self) -> String {
        format!(
            "{} - {} ({}ms)",
            self.outcome.label(),
            self.test_name,
            self.duration.as_millis()
        )
    }
}

/// Result of running a set of units against one source
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub generated_at: DateTime<Utc>,
    /// Description of the output source that was read
    pub source: String,
    pub units: Vec<UnitReport>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.units.iter().all(|u| u.outcome.passed())
    }

    pub fn passed_count(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.units.len() - self.passed_count()
    }

    pub fn total_duration(&self) -> Duration {
        self.units.iter().map(|u| u.duration).sum()
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}
