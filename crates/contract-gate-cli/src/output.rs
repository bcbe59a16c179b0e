// crates/contract-gate-cli/src/output.rs
// ============================================================================
// Module: CLI Output
// Description: Report rendering and exit-code policy.
// Purpose: Render suite results for humans or machines and map them to codes.
// Dependencies: contract-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Text output is the report's own rendering. JSON output wraps the outcomes
//! with summary counts so a CI step can gate on a single object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use contract_gate_core::Scenario;
use contract_gate_core::ScenarioOutcome;
use contract_gate_core::SuiteReport;
use serde::Serialize;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Every selected scenario passed.
pub const EXIT_PASSED: u8 = 0;
/// At least one scenario failed.
pub const EXIT_FAILED: u8 = 1;
/// The harness itself could not run (configuration, filter, or output).
pub const EXIT_HARNESS_ERROR: u8 = 2;

/// Maps a finished suite to its exit code.
#[must_use]
pub fn suite_exit_code(report: &SuiteReport) -> u8 {
    if report.is_success() { EXIT_PASSED } else { EXIT_FAILED }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// JSON report envelope.
#[derive(Serialize)]
struct ReportView<'a> {
    /// Scenario count.
    total: usize,
    /// Passed count.
    passed: usize,
    /// Failed count.
    failed: usize,
    /// Leak warning count.
    leak_warnings: usize,
    /// Per-scenario outcomes.
    outcomes: &'a [ScenarioOutcome],
}

/// Renders `report` in `format`.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when JSON serialization fails.
pub fn render_report(report: &SuiteReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => serde_json::to_string_pretty(&ReportView {
            total: report.total(),
            passed: report.passed(),
            failed: report.failed(),
            leak_warnings: report.leak_count(),
            outcomes: &report.outcomes,
        }),
    }
}

/// Renders one line per scenario with its name and description.
#[must_use]
pub fn render_scenario_list(scenarios: &[Scenario]) -> String {
    let width = scenarios.iter().map(|scenario| scenario.name().len()).max().unwrap_or(0);
    let mut output = String::new();
    for scenario in scenarios {
        let _ = writeln!(
            output,
            "{:<width$}  {}",
            scenario.name(),
            scenario.description(),
            width = width
        );
    }
    output
}

// ============================================================================
// SECTION: Tests
// ============================================================================
