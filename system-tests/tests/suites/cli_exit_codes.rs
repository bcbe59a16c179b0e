// system-tests/tests/suites/cli_exit_codes.rs
// ============================================================================
// Module: CLI Exit Code Suite
// Description: Runs the contract-gate binary against the mock service.
// Purpose: Prove exit codes and report output for passing and drifting runs.
// Dependencies: system-tests, helpers
// ============================================================================

//! CLI end-to-end system tests.

use std::fs;

use serde_json::Value;
use system_tests::mock::Drift;
use system_tests::mock::MockPetStore;

use crate::helpers::artifacts::TestArtifacts;
use crate::helpers::cli::cli_binary;
use crate::helpers::cli::run_cli;

#[test]
fn passing_run_exits_zero() -> Result<(), String> {
    let binary = cli_binary().ok_or("contract-gate binary unavailable")?;
    let store = MockPetStore::start()?;
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let output = run_cli(
        &binary,
        dir.path(),
        &["run", "--base-url", store.base_url(), "--events", "none", "--format", "json"],
    )?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let artifacts = TestArtifacts::new("cli_passing_run").map_err(|err| err.to_string())?;
    artifacts.write_text("stdout.json", &stdout).map_err(|err| err.to_string())?;
    if output.status.code() != Some(0) {
        return Err(format!("exit {:?}: {stdout}", output.status.code()));
    }
    let report: Value = serde_json::from_str(&stdout).map_err(|err| err.to_string())?;
    if report["passed"] != 7 {
        return Err(format!("unexpected report {report}"));
    }
    Ok(())
}

#[test]
fn drifting_run_exits_one_and_names_the_field() -> Result<(), String> {
    let binary = cli_binary().ok_or("contract-gate binary unavailable")?;
    let store = MockPetStore::start_with(Drift::drop_field("name"))?;
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let output = run_cli(
        &binary,
        dir.path(),
        &["run", "--base-url", store.base_url(), "--events", "none", "--scenario", "get_pet_by_id"],
    )?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.code() != Some(1) {
        return Err(format!("exit {:?}: {stdout}", output.status.code()));
    }
    if !stdout.contains("FAIL get_pet_by_id") || !stdout.contains("name") {
        return Err(format!("report does not name the drift: {stdout}"));
    }
    Ok(())
}

#[test]
fn config_file_drives_the_run() -> Result<(), String> {
    let binary = cli_binary().ok_or("contract-gate binary unavailable")?;
    let store = MockPetStore::start()?;
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let log = dir.path().join("events.jsonl");
    let config = format!(
        "base_url = \"{}\"\ntimeout_ms = 5000\n\n[events]\nsink = \"file\"\npath = \"{}\"\n",
        store.base_url(),
        log.display()
    );
    fs::write(dir.path().join("contract-gate.toml"), config).map_err(|err| err.to_string())?;
    let output = run_cli(&binary, dir.path(), &["run", "--scenario", "delete_nonexistent_pet"])?;
    if output.status.code() != Some(0) {
        return Err(format!("exit {:?}: {}", output.status.code(), String::from_utf8_lossy(&output.stderr)));
    }
    let events = fs::read_to_string(&log).map_err(|err| err.to_string())?;
    if !events.lines().any(|line| line.contains("\"delete_by_id\"")) {
        return Err(format!("request event missing from {events}"));
    }
    Ok(())
}

#[test]
fn bad_config_exits_two() -> Result<(), String> {
    let binary = cli_binary().ok_or("contract-gate binary unavailable")?;
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    fs::write(dir.path().join("contract-gate.toml"), "base_url = \"ftp://nowhere\"\n")
        .map_err(|err| err.to_string())?;
    let output = run_cli(&binary, dir.path(), &["run"])?;
    if output.status.code() != Some(2) {
        return Err(format!("exit {:?}", output.status.code()));
    }
    if !output.stdout.is_empty() {
        return Err("no report may be printed when the harness cannot run".to_string());
    }
    Ok(())
}
