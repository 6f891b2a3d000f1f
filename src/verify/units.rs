//! The verification units: one per infrastructure resource group

use anyhow::{bail, Result};
use serde::Serialize;

use crate::keys::outputs;

/// An output a unit requires, with the message reported when it is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredOutput {
    pub key: &'static str,
    pub message: &'static str,
}

/// A named set of outputs that must exist and be non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationUnit {
    /// Identifier used on the command line
    pub id: &'static str,
    /// Name of the corresponding test entry point
    pub test_name: &'static str,
    pub description: &'static str,
    /// Outputs in fetch order
    pub outputs: &'static [RequiredOutput],
}

impl VerificationUnit {
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outputs.iter().map(|o| o.key)
    }
}

pub const COMPUTE_SERVICE: VerificationUnit = VerificationUnit {
    id: "compute",
    test_name: "cloud_run_configuration",
    description: "Cloud Run compute service",
    outputs: &[
        RequiredOutput {
            key: outputs::CLOUD_RUN_URL,
            message: "Cloud Run service URL should not be empty",
        },
        RequiredOutput {
            key: outputs::REGION,
            message: "Region should not be empty",
        },
    ],
};

pub const MANAGED_DATABASE: VerificationUnit = VerificationUnit {
    id: "database",
    test_name: "cloud_sql_configuration",
    description: "Cloud SQL managed database",
    outputs: &[
        RequiredOutput {
            key: outputs::DB_INSTANCE_NAME,
            message: "DB instance name should not be empty",
        },
        RequiredOutput {
            key: outputs::PROJECT_ID,
            message: "Project ID should not be empty",
        },
        RequiredOutput {
            key: outputs::REGION,
            message: "Region should not be empty",
        },
    ],
};

pub const OBJECT_STORAGE: VerificationUnit = VerificationUnit {
    id: "storage",
    test_name: "storage_bucket_configuration",
    description: "Cloud Storage media bucket",
    outputs: &[
        RequiredOutput {
            key: outputs::MEDIA_BUCKET_NAME,
            message: "Bucket name should not be empty",
        },
        RequiredOutput {
            key: outputs::PROJECT_ID,
            message: "Project ID should not be empty",
        },
    ],
};

/// Every unit, in reporting order
pub const ALL_UNITS: &[VerificationUnit] = &[COMPUTE_SERVICE, MANAGED_DATABASE, OBJECT_STORAGE];

/// Look up a unit by its id or test name
pub fn find_unit(name: &str) -> Option<&'static VerificationUnit> {
    ALL_UNITS
        .iter()
        .find(|u| u.id == name || u.test_name == name)
}

/// Resolve unit names, or every unit when none are given.
///
/// Duplicates are dropped; order follows the arguments.
pub fn select_units(names: &[String]) -> Result<Vec<&'static VerificationUnit>> {
    if names.is_empty() {
        return Ok(ALL_UNITS.iter().collect());
    }

    let mut selected: Vec<&'static VerificationUnit> = Vec::new();
    for name in names {
        let Some(unit) = find_unit(name) else {
            let known: Vec<&str> = ALL_UNITS.iter().map(|u| u.id).collect();
            bail!("Unknown unit '{name}'. Use one of: {}", known.join(", "));
        };
        if !selected.iter().any(|u| u.id == unit.id) {
            selected.push(unit);
        }
    }
    Ok(selected)
}

/// Clap value parser for unit names
pub fn clap_unit_validator(s: &str) -> Result<String, String> {
    match find_unit(s) {
        Some(unit) => Ok(unit.id.to_string()),
        None => Err(format!(
            "unknown unit '{s}' (expected compute, database or storage)"
        )),
    }
}
