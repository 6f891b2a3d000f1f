//! Verification units and the machinery that runs them
//!
//! A unit fetches a fixed set of outputs and asserts each one is non-empty.
//! A missing output is fatal to the unit; an empty value only marks it
//! failed, and the remaining assertions still run.

pub mod assert;
pub mod report;
pub mod result;
pub mod runner;
pub mod units;

pub use assert::{AssertionResult, Checker};
pub use result::{SuiteReport, UnitOutcome, UnitReport};
pub use runner::{assert_unit_passes, run_unit, run_unit_report, run_units};
pub use units::{
    find_unit, select_units, RequiredOutput, VerificationUnit, ALL_UNITS, COMPUTE_SERVICE,
    MANAGED_DATABASE, OBJECT_STORAGE,
};
