//! Integration tests for verification units against state fixtures and the CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use infra_verify::keys;
use infra_verify::outputs::{StateFile, DEFAULT_STATE_FILE};
use infra_verify::verify::{
    run_unit, run_units, UnitOutcome, ALL_UNITS, COMPUTE_SERVICE, MANAGED_DATABASE,
    OBJECT_STORAGE,
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Write a v4 state file whose outputs are the given string values
fn write_state(dir: &Path, outputs: &[(&str, &str)]) -> StateFile {
    let outputs: serde_json::Map<String, Value> = outputs
        .iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                json!({"value": v, "type": "string", "sensitive": false}),
            )
        })
        .collect();
    write_state_outputs(dir, Value::Object(outputs))
}

/// Write a v4 state file with a raw `outputs` object
fn write_state_outputs(dir: &Path, outputs: Value) -> StateFile {
    let state = json!({
        "version": 4,
        "terraform_version": "1.7.5",
        "serial": 3,
        "lineage": "2f1c7a2e-0000-0000-0000-000000000000",
        "outputs": outputs,
        "resources": [],
        "check_results": null
    });
    fs::write(
        dir.join(DEFAULT_STATE_FILE),
        serde_json::to_string_pretty(&state).unwrap(),
    )
    .unwrap();
    StateFile::in_dir(dir)
}

fn complete_state(dir: &Path) -> StateFile {
    write_state(
        dir,
        &[
            ("cloud_run_url", "https://svc.example.run.app"),
            ("region", "us-central1"),
            ("db_instance_name", "prod-db"),
            ("project_id", "proj-123"),
            ("media_bucket_name", "proj-123-media"),
        ],
    )
}

fn infra_verify(args: &[&str], cwd: &Path) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_infra-verify"));
    cmd.args(args).current_dir(cwd).env("NO_COLOR", "1");
    for var in keys::env::ALL {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to run infra-verify")
}

#[test]
fn test_compute_passes_with_url_and_region() {
    let temp = TempDir::new().unwrap();
    let state = write_state(
        temp.path(),
        &[
            ("cloud_run_url", "https://svc.example.run.app"),
            ("region", "us-central1"),
        ],
    );

    assert!(run_unit(&COMPUTE_SERVICE, &state).passed());
}

#[test]
fn test_compute_empty_url_reports_and_checks_region() {
    let temp = TempDir::new().unwrap();
    let state = write_state(
        temp.path(),
        &[("cloud_run_url", ""), ("region", "us-central1")],
    );

    let outcome = run_unit(&COMPUTE_SERVICE, &state);

    assert_eq!(
        outcome.failures(),
        vec!["Cloud Run service URL should not be empty".to_string()]
    );
    let region = outcome
        .checks()
        .iter()
        .find(|c| c.key == "region")
        .expect("region assertion should still run");
    assert!(region.passed);
}

#[test]
fn test_database_passes() {
    let temp = TempDir::new().unwrap();
    let state = write_state(
        temp.path(),
        &[
            ("db_instance_name", "prod-db"),
            ("project_id", "proj-123"),
            ("region", "us-east1"),
        ],
    );

    assert!(run_unit(&MANAGED_DATABASE, &state).passed());
}

#[test]
fn test_storage_missing_bucket_aborts() {
    let temp = TempDir::new().unwrap();
    let state = write_state(temp.path(), &[("project_id", "proj-123")]);

    let outcome = run_unit(&OBJECT_STORAGE, &state);

    match outcome {
        UnitOutcome::Aborted { key, .. } => assert_eq!(key.as_deref(), Some("media_bucket_name")),
        other => panic!("expected Aborted, got {other:?}"),
    }
}

#[test]
fn test_missing_state_file_aborts_every_unit() {
    let temp = TempDir::new().unwrap();
    let state = StateFile::in_dir(temp.path());
    let units: Vec<_> = ALL_UNITS.iter().collect();

    let suite = run_units(&units, &state);

    assert_eq!(suite.failed_count(), 3);
    for unit in &suite.units {
        match &unit.outcome {
            UnitOutcome::Aborted { key, reason } => {
                assert!(key.is_none());
                assert!(reason.contains("state file not found"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
    }
}

#[test]
fn test_cli_run_passes_against_state() {
    let temp = TempDir::new().unwrap();
    complete_state(temp.path());
    let dir = temp.path().to_string_lossy().to_string();

    let output = infra_verify(&["run", "--dir", &dir, "--state"], temp.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All 3 unit(s) passed"));
}

#[test]
fn test_cli_run_json_report_fails_on_empty_value() {
    let temp = TempDir::new().unwrap();
    write_state(
        temp.path(),
        &[("media_bucket_name", ""), ("project_id", "proj-123")],
    );
    let state_path = temp.path().join(DEFAULT_STATE_FILE);
    let state_arg = state_path.to_string_lossy().to_string();

    let output = infra_verify(&["run", "storage", "--json", "--state", &state_arg], temp.path());

    assert!(!output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let unit = &report["units"][0];
    assert_eq!(unit["unit"], "storage");
    assert_eq!(unit["outcome"]["status"], "failed");
    assert_eq!(
        unit["outcome"]["failures"][0],
        "Bucket name should not be empty"
    );
    assert_eq!(unit["outcome"]["checks"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_reads_config_file_from_working_dir() {
    let temp = TempDir::new().unwrap();
    let infra = temp.path().join("infra");
    fs::create_dir_all(&infra).unwrap();
    complete_state(&infra);
    fs::write(
        temp.path().join("infra-verify.toml"),
        "terraform_dir = \"infra\"\nsource = \"state\"\n",
    )
    .unwrap();

    let output = infra_verify(&["output", "db_instance_name"], temp.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "prod-db");
}

#[test]
fn test_cli_output_missing_key_fails() {
    let temp = TempDir::new().unwrap();
    complete_state(temp.path());
    let dir = temp.path().to_string_lossy().to_string();

    let output = infra_verify(&["output", "api_key", "--dir", &dir, "--state"], temp.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("api_key"));
}

#[test]
fn test_cli_list_units_json() {
    let temp = TempDir::new().unwrap();

    let output = infra_verify(&["list", "--json"], temp.path());

    assert!(output.status.success());
    let units: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = units
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["compute", "database", "storage"]);
}

#[test]
fn test_cli_list_units_shows_messages() {
    let temp = TempDir::new().unwrap();

    let output = infra_verify(&["list"], temp.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for unit in ALL_UNITS {
        assert!(stdout.contains(unit.test_name));
        for required in unit.outputs {
            let line = stdout
                .lines()
                .find(|l| l.contains(required.message))
                .unwrap_or_else(|| panic!("no line for '{}'", required.message));
            assert!(line.contains(required.key));
        }
    }
}

#[test]
fn test_cli_outputs_redacts_sensitive_and_marks_empty() {
    let temp = TempDir::new().unwrap();
    write_state_outputs(
        temp.path(),
        json!({
            "region": {"value": "us-central1", "type": "string", "sensitive": false},
            "cloud_run_url": {"value": "", "type": "string", "sensitive": false},
            "db_password": {"value": "hunter2", "type": "string", "sensitive": true}
        }),
    );
    let dir = temp.path().to_string_lossy().to_string();

    let output = infra_verify(&["outputs", "--dir", &dir, "--state"], temp.path());

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("hunter2"));
    let line_for = |key: &str| {
        stdout
            .lines()
            .find(|l| l.starts_with(key))
            .unwrap_or_else(|| panic!("no line for '{key}'"))
            .to_string()
    };
    assert!(line_for("db_password").contains("(sensitive)"));
    assert!(line_for("cloud_run_url").contains("\"\""));
    assert!(line_for("region").contains("us-central1"));
}

#[test]
fn test_cli_outputs_reports_empty_state() {
    let temp = TempDir::new().unwrap();
    write_state_outputs(temp.path(), json!({}));
    let dir = temp.path().to_string_lossy().to_string();

    let output = infra_verify(&["outputs", "--dir", &dir, "--state"], temp.path());

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No outputs found"));
}

#[test]
fn test_cli_output_redacts_sensitive_state_value() {
    let temp = TempDir::new().unwrap();
    write_state_outputs(
        temp.path(),
        json!({"db_password": {"value": "hunter2", "type": "string", "sensitive": true}}),
    );
    let dir = temp.path().to_string_lossy().to_string();

    let hidden = infra_verify(&["output", "db_password", "--dir", &dir, "--state"], temp.path());
    assert!(hidden.status.success());
    assert_eq!(String::from_utf8_lossy(&hidden.stdout).trim(), "(sensitive)");

    let shown = infra_verify(
        &["output", "db_password", "--show-sensitive", "--dir", &dir, "--state"],
        temp.path(),
    );
    assert!(shown.status.success());
    assert_eq!(String::from_utf8_lossy(&shown.stdout).trim(), "hunter2");
}

#[cfg(unix)]
mod tool_backend {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    // Answers the full listing the way the real tool does, and the bare
    // value for `output -json <key>` without any sensitivity information.
    const FAKE_TOOL: &str = r#"#!/bin/sh
if [ -n "$4" ]; then
  echo '"hunter2"'
else
  echo '{"db_password":{"sensitive":true,"type":"string","value":"hunter2"},"region":{"sensitive":false,"type":"string","value":"us-central1"}}'
fi
"#;

    fn install_fake_tool(dir: &Path) -> String {
        let script = dir.join("fake-terraform");
        fs::write(&script, FAKE_TOOL).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().to_string()
    }

    #[test]
    fn test_cli_output_redacts_sensitive_tool_value() {
        let temp = TempDir::new().unwrap();
        let binary = install_fake_tool(temp.path());
        let dir = temp.path().to_string_lossy().to_string();

        let output = infra_verify(
            &["output", "db_password", "--dir", &dir, "--binary", &binary],
            temp.path(),
        );

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains("hunter2"));
        assert_eq!(stdout.trim(), "(sensitive)");
    }

    #[test]
    fn test_cli_output_plain_tool_value() {
        let temp = TempDir::new().unwrap();
        let binary = install_fake_tool(temp.path());
        let dir = temp.path().to_string_lossy().to_string();

        let output = infra_verify(
            &["output", "region", "--dir", &dir, "--binary", &binary],
            temp.path(),
        );

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "us-central1");
    }
}
