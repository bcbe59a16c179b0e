// system-tests/tests/suites/catalog.rs
// ============================================================================
// Module: Catalog Suite
// Description: Runs the built-in scenarios against a conforming service.
// Purpose: Prove the full catalog passes end-to-end and leaves nothing behind.
// Dependencies: system-tests, helpers
// ============================================================================

//! Full-catalog system tests against the conforming mock service.

use contract_gate_core::ScenarioPhase;
use serde_json::json;
use system_tests::mock::MockPetStore;

use crate::helpers::harness::run_catalog;

#[test]
fn full_catalog_passes_against_conforming_service() -> Result<(), String> {
    let store = MockPetStore::start()?;
    let run = run_catalog("full_catalog_passes", store.base_url(), &[])?;
    if !run.report.is_success() {
        return Err(format!("catalog failed:\n{}", run.report.render_text()));
    }
    if run.report.total() != 7 || run.report.leak_count() != 0 {
        return Err(format!("unexpected counts:\n{}", run.report.render_text()));
    }
    for outcome in &run.report.outcomes {
        if outcome.phase_reached != ScenarioPhase::Validated {
            return Err(format!("{} stopped at {}", outcome.name, outcome.phase_reached));
        }
    }
    if !store.ids().is_empty() {
        return Err(format!("fixtures left behind: {:?}", store.ids()));
    }
    Ok(())
}

#[test]
fn observed_statuses_match_the_catalog() -> Result<(), String> {
    let store = MockPetStore::start()?;
    let run = run_catalog("observed_statuses", store.base_url(), &[])?;
    let expected = [
        ("get_pet_by_id", 200),
        ("get_pet_by_invalid_id", 404),
        ("add_new_pet", 200),
        ("update_existing_pet", 200),
        ("find_pets_by_status", 200),
        ("delete_pet", 200),
        ("delete_nonexistent_pet", 404),
    ];
    for (name, status) in expected {
        let outcome = run.report.outcome(name).ok_or_else(|| format!("{name} missing"))?;
        if outcome.observed_status != Some(status) {
            return Err(format!("{name} observed {:?}, expected {status}", outcome.observed_status));
        }
    }
    Ok(())
}

#[test]
fn listing_validates_every_seeded_record() -> Result<(), String> {
    let store = MockPetStore::start()?;
    for id in 500..505 {
        store.seed(json!({"id": id, "name": format!("pet-{id}"), "photoUrls": [], "status": "available"}));
    }
    store.seed(json!({"id": 600, "name": "sold-one", "photoUrls": [], "status": "sold"}));
    let run = run_catalog("listing_validates_seeded", store.base_url(), &["find_pets_by_status"])?;
    if !run.report.is_success() {
        return Err(run.report.render_text());
    }
    let listed = store
        .requests()
        .iter()
        .any(|request| request.url == "/v2/pet/findByStatus?status=available");
    if !listed {
        return Err("findByStatus request not observed".to_string());
    }
    Ok(())
}

#[test]
fn delete_requests_carry_the_api_key() -> Result<(), String> {
    let store = MockPetStore::start()?;
    let run = run_catalog("delete_carries_key", store.base_url(), &["delete_pet"])?;
    if !run.report.is_success() {
        return Err(run.report.render_text());
    }
    let methods: Vec<String> = store.requests().into_iter().map(|r| format!("{} {}", r.method, r.url)).collect();
    let expected = ["POST /v2/pet", "DELETE /v2/pet/2", "GET /v2/pet/2", "DELETE /v2/pet/2"];
    if methods != expected {
        return Err(format!("unexpected request sequence {methods:?}"));
    }
    Ok(())
}
