//! Soft assertions
//!
//! A failed assertion marks the enclosing unit failed but does not stop it,
//! so every sibling assertion still runs and reports.

use serde::Serialize;

/// Outcome of one assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionResult {
    /// Output key the assertion was made about
    pub key: String,
    /// Failure message naming the semantic field
    pub message: String,
    pub passed: bool,
}

/// Collects assertion results for a single verification unit
#[derive(Debug, Default)]
pub struct Checker {
    results: Vec<AssertionResult>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert that `value` is not the empty string.
    ///
    /// Returns whether the assertion held. A failure is recorded with
    /// `message` and execution continues.
    pub fn assert_non_empty(&mut self, key: &str, value: &str, message: &str) -> bool {
        let passed = !value.is_empty();
        if !passed {
            tracing::debug!(key, failure = message, "assertion failed");
        }
        self.results.push(AssertionResult {
            key: key.to_string(),
            message: message.to_string(),
            passed,
        });
        passed
    }

    pub fn results(&self) -> &[AssertionResult] {
        &self.results
    }

    /// Messages of every failed assertion, in evaluation order
    pub fn failures(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn into_results(self) -> Vec<AssertionResult> {
        self.results
    }
}
