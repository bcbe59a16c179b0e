// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: In-Process Harness
// Description: Runs the scenario catalog against a base URL inside the test.
// Purpose: Exercise the real HTTP client and runner without spawning the CLI.
// Dependencies: contract-gate-core, contract-gate-client, system-tests
// ============================================================================

use std::time::Duration;

use contract_gate_client::HttpClientConfig;
use contract_gate_client::HttpContractClient;
use contract_gate_core::AuthToken;
use contract_gate_core::MemoryEventSink;
use contract_gate_core::SchemaRegistry;
use contract_gate_core::SuiteReport;
use contract_gate_core::SuiteRunner;
use contract_gate_core::runtime::petstore;
use system_tests::config::SystemTestConfig;
use system_tests::mock::DEFAULT_API_KEY;

use super::artifacts::TestArtifacts;

/// Default per-call timeout for suites.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of an in-process run.
pub struct HarnessRun {
    /// Suite report.
    pub report: SuiteReport,
    /// Events the run emitted.
    pub events: MemoryEventSink,
}

/// Builds an HTTP client for `base_url` honoring the system-test timeout.
pub fn client_for(base_url: &str) -> Result<HttpContractClient, String> {
    let config = SystemTestConfig::load()?;
    let timeout = config.timeout.unwrap_or(DEFAULT_CALL_TIMEOUT);
    HttpContractClient::new(&HttpClientConfig {
        base_url: base_url.to_string(),
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ..HttpClientConfig::default()
    })
    .map_err(|err| err.to_string())
}

/// Runs the named catalog scenarios (all when empty) against `base_url` and
/// stores the report under the test's artifact root.
pub fn run_catalog(test_name: &str, base_url: &str, names: &[&str]) -> Result<HarnessRun, String> {
    let client = client_for(base_url)?;
    let registry = SchemaRegistry::with_builtin_contracts();
    let events = MemoryEventSink::new();
    let scenarios = petstore::scenarios();
    let names: Vec<String> = names.iter().map(|name| (*name).to_string()).collect();
    let report = SuiteRunner::new(&registry, &client, AuthToken::new(DEFAULT_API_KEY), &events)
        .run_filtered(&scenarios, &names)
        .map_err(|err| err.to_string())?;
    let artifacts = TestArtifacts::new(test_name).map_err(|err| err.to_string())?;
    artifacts.write_report(&report).map_err(|err| err.to_string())?;
    Ok(HarnessRun {
        report,
        events,
    })
}
