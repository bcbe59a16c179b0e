// system-tests/tests/suites/live_service.rs
// ============================================================================
// Module: Live Service Suite
// Description: Runs the catalog against a real deployment when configured.
// Purpose: Check the public service still honors the contract.
// Dependencies: system-tests, helpers
// ============================================================================

//! Opt-in live service test; skipped unless
//! `CONTRACT_GATE_SYSTEM_TEST_LIVE_URL` is set.

use system_tests::config::SystemTestConfig;

use crate::helpers::harness::run_catalog;

#[test]
fn live_service_honors_the_contract() -> Result<(), String> {
    let config = SystemTestConfig::load()?;
    let Some(base_url) = config.live_base_url else {
        return Ok(());
    };
    let run = run_catalog("live_service", &base_url, &[])?;
    if !run.report.is_success() {
        return Err(run.report.render_text());
    }
    Ok(())
}
