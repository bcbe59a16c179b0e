// system-tests/tests/suites/drift.rs
// ============================================================================
// Module: Drift Suite
// Description: Runs the catalog against services that break the contract.
// Purpose: Prove every drift is reported with the field and status involved.
// Dependencies: system-tests, helpers
// ============================================================================

//! Contract drift system tests.

use contract_gate_core::FieldViolation;
use contract_gate_core::HarnessError;
use contract_gate_core::ScenarioOutcome;
use serde_json::json;
use system_tests::mock::Drift;
use system_tests::mock::MockPetStore;

use crate::helpers::harness::run_catalog;

fn violations(outcome: &ScenarioOutcome) -> Result<&[FieldViolation], String> {
    match &outcome.failure {
        Some(HarnessError::SchemaViolation(violation)) => Ok(&violation.violations),
        other => Err(format!("{} expected schema violation, got {other:?}", outcome.name)),
    }
}

#[test]
fn missing_field_fails_every_record_scenario() -> Result<(), String> {
    let store = MockPetStore::start_with(Drift::drop_field("photoUrls"))?;
    let run = run_catalog("missing_field", store.base_url(), &[])?;
    for name in ["get_pet_by_id", "add_new_pet", "update_existing_pet"] {
        let outcome = run.report.outcome(name).ok_or_else(|| format!("{name} missing"))?;
        let found = violations(outcome)?;
        let named = found.iter().any(|violation| {
            matches!(violation, FieldViolation::Missing { field, .. } if field == "photoUrls")
        });
        if !named {
            return Err(format!("{name} did not name photoUrls: {found:?}"));
        }
    }
    for name in ["get_pet_by_invalid_id", "delete_pet", "delete_nonexistent_pet"] {
        let outcome = run.report.outcome(name).ok_or_else(|| format!("{name} missing"))?;
        if !outcome.passed() {
            return Err(format!("{name} should not depend on record shape"));
        }
    }
    if !run.report.render_text().contains("photoUrls") {
        return Err("text report does not name the missing field".to_string());
    }
    if !store.ids().is_empty() {
        return Err(format!("failed scenarios leaked fixtures: {:?}", store.ids()));
    }
    Ok(())
}

#[test]
fn mistyped_field_is_reported_with_both_types() -> Result<(), String> {
    let store = MockPetStore::start_with(Drift::override_field("id", json!("12345")))?;
    let run = run_catalog("mistyped_field", store.base_url(), &["add_new_pet"])?;
    let outcome = run.report.outcome("add_new_pet").ok_or("add_new_pet missing")?;
    let found = violations(outcome)?;
    let expected = FieldViolation::TypeMismatch {
        field: "id".to_string(),
        expected: contract_gate_core::FieldType::Integer,
        actual: "string",
    };
    if found != [expected] {
        return Err(format!("unexpected violations {found:?}"));
    }
    Ok(())
}

#[test]
fn ignored_update_is_a_field_mismatch() -> Result<(), String> {
    let store = MockPetStore::start_with(Drift {
        ignore_updates: true,
        ..Drift::default()
    })?;
    let run = run_catalog("ignored_update", store.base_url(), &["update_existing_pet"])?;
    let outcome = run.report.outcome("update_existing_pet").ok_or("update missing")?;
    let fields: Vec<String> = violations(outcome)?
        .iter()
        .filter_map(|violation| match violation {
            FieldViolation::FieldMismatch { field, .. } => Some(field.clone()),
            _ => None,
        })
        .collect();
    if fields != ["name", "status"] {
        return Err(format!("unexpected mismatches {fields:?}"));
    }
    Ok(())
}

#[test]
fn listing_drift_locates_the_element() -> Result<(), String> {
    let store = MockPetStore::start()?;
    store.seed(json!({"id": 700, "name": "ok", "photoUrls": [], "status": "available"}));
    store.seed(json!({"id": 701, "photoUrls": [], "status": "available"}));
    let run = run_catalog("listing_drift", store.base_url(), &["find_pets_by_status"])?;
    let outcome = run.report.outcome("find_pets_by_status").ok_or("listing missing")?;
    let rendered: Vec<String> = violations(outcome)?.iter().map(ToString::to_string).collect();
    if rendered.len() != 1 || !rendered[0].contains("[1].name") {
        return Err(format!("unexpected violations {rendered:?}"));
    }
    Ok(())
}

#[test]
fn unexpected_status_carries_the_body() -> Result<(), String> {
    let store = MockPetStore::start_with(Drift {
        create_status: Some(500),
        ..Drift::default()
    })?;
    let run = run_catalog("unexpected_status", store.base_url(), &["add_new_pet", "get_pet_by_id"])?;
    let add = run.report.outcome("add_new_pet").ok_or("add missing")?;
    match &add.failure {
        Some(HarnessError::UnexpectedStatus { got: 500, body, .. }) if body.contains("create rejected") => {}
        other => return Err(format!("add_new_pet: unexpected failure {other:?}")),
    }
    let get = run.report.outcome("get_pet_by_id").ok_or("get missing")?;
    match &get.failure {
        Some(HarnessError::FixtureProvision(detail)) if detail.status == 500 => {}
        other => return Err(format!("get_pet_by_id: unexpected failure {other:?}")),
    }
    Ok(())
}
