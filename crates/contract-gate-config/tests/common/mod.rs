// crates/contract-gate-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config loading and validation tests.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use contract_gate_config::ConfigError;
use contract_gate_config::HarnessConfig;

/// Test result alias; failures carry a message.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `HarnessConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<HarnessConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a config with every default applied.
pub fn minimal_config() -> Result<HarnessConfig, toml::de::Error> {
    config_from_toml("")
}

/// Writes `content` into `dir/name` and returns the path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.path().join(name);
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Environment lookup backed by a fixed map.
pub fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> + use<> {
    let map: BTreeMap<String, OsString> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), OsString::from(*value))).collect();
    move |name| map.get(name).cloned()
}

/// Environment lookup with nothing set.
pub fn no_env(_name: &str) -> Option<OsString> {
    None
}

/// Requires `result` to fail with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
