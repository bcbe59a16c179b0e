// system-tests/tests/suites/teardown.rs
// ============================================================================
// Module: Teardown Suite
// Description: Fixture cleanup under failing deletes and unreachable services.
// Purpose: Prove cleanup problems surface as warnings, never as failures.
// Dependencies: system-tests, helpers
// ============================================================================

//! Fixture teardown and transport failure system tests.

use std::net::TcpListener;

use contract_gate_core::ScenarioPhase;
use system_tests::mock::Drift;
use system_tests::mock::MockPetStore;

use crate::helpers::harness::run_catalog;

#[test]
fn failed_teardown_is_a_warning() -> Result<(), String> {
    let store = MockPetStore::start()?;
    store.set_drift(Drift {
        delete_status: Some(500),
        ..Drift::default()
    });
    let run = run_catalog("failed_teardown", store.base_url(), &["get_pet_by_id"])?;
    let outcome = run.report.outcome("get_pet_by_id").ok_or("get missing")?;
    if !outcome.passed() {
        return Err(format!("leak must not fail the scenario:\n{}", run.report.render_text()));
    }
    if outcome.leaks.len() != 1 || outcome.leaks[0].id != 1 || outcome.leaks[0].status != Some(500) {
        return Err(format!("unexpected leaks {:?}", outcome.leaks));
    }
    if !run.events.names().contains(&"fixture_leak") {
        return Err("fixture_leak event missing".to_string());
    }
    if store.ids() != [1] {
        return Err(format!("expected the leaked fixture to remain, found {:?}", store.ids()));
    }
    Ok(())
}

#[test]
fn unreachable_service_fails_every_scenario_without_aborting() -> Result<(), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    drop(listener);
    let run = run_catalog("unreachable_service", &format!("http://{addr}/v2"), &[])?;
    if run.report.total() != 7 || run.report.failed() != 7 {
        return Err(format!("expected 7 failures:\n{}", run.report.render_text()));
    }
    for outcome in &run.report.outcomes {
        let label = outcome.failure.as_ref().map(contract_gate_core::HarnessError::label);
        if label != Some("transport_error") {
            return Err(format!("{} failed with {label:?}", outcome.name));
        }
    }
    let provisioned = run.report.outcome("get_pet_by_id").ok_or("get missing")?;
    if provisioned.phase_reached != ScenarioPhase::Pending {
        return Err(format!("fixture failure reached {}", provisioned.phase_reached));
    }
    Ok(())
}
