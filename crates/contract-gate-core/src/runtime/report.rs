// crates/contract-gate-core/src/runtime/report.rs
// ============================================================================
// Module: Suite Report
// Description: Per-scenario outcomes and their text and JSON renderings.
// Purpose: Give operators a complete account of every contract breach.
// Dependencies: crate::{core, runtime::scenario}, serde
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] lists one [`ScenarioOutcome`] per executed scenario in
//! execution order. Failures keep the full [`HarnessError`], so the rendering
//! can name the status mismatch or every missing and mistyped field. Leak
//! warnings are listed but never change a scenario's status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Serialize;
use serde::Serializer;

use crate::core::FieldViolation;
use crate::core::FixtureLeakWarning;
use crate::core::HarnessError;
use crate::runtime::scenario::ScenarioPhase;
use crate::runtime::scenario::ScenarioStatus;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: String,
    /// Final status.
    pub status: ScenarioStatus,
    /// Furthest phase reached before teardown.
    pub phase_reached: ScenarioPhase,
    /// Failure, when the scenario failed.
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<HarnessError>,
    /// Status returned by the operation under test, when known.
    pub observed_status: Option<u16>,
    /// Teardown leak warnings.
    pub leaks: Vec<FixtureLeakWarning>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Returns true when the scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Serialized failure shape.
#[derive(Serialize)]
struct FailureView<'a> {
    /// Stable failure label.
    label: &'static str,
    /// Rendered failure message.
    message: String,
    /// Field-level violations for schema failures.
    violations: &'a [FieldViolation],
}

/// Serializes a failure as `{ label, message, violations }`.
fn serialize_failure<S: Serializer>(
    failure: &Option<HarnessError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let view = failure.as_ref().map(|error| FailureView {
        label: error.label(),
        message: error.to_string(),
        violations: match error {
            HarnessError::SchemaViolation(violation) => violation.violations.as_slice(),
            _ => &[],
        },
    });
    view.serialize(serializer)
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcomes of a suite run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Outcomes in execution order.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// Returns the scenario count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the passed scenario count.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    /// Returns the failed scenario count.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Returns the total number of leak warnings.
    #[must_use]
    pub fn leak_count(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.leaks.len()).sum()
    }

    /// Returns true when every scenario passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Returns the outcome for `name`, if it ran.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    /// Renders the human-readable report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let marker = if outcome.passed() { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "{marker} {} ({} ms, reached {})",
                outcome.name, outcome.duration_ms, outcome.phase_reached
            );
            if let Some(failure) = &outcome.failure {
                render_failure(&mut out, failure);
            }
            for leak in &outcome.leaks {
                let _ = writeln!(out, "    warning: {leak}");
            }
        }
        let _ = writeln!(
            out,
            "{} scenarios: {} passed, {} failed, {} leak warnings",
            self.total(),
            self.passed(),
            self.failed(),
            self.leak_count()
        );
        out
    }
}

/// Writes the indented failure detail.
fn render_failure(out: &mut String, failure: &HarnessError) {
    match failure {
        HarnessError::SchemaViolation(violation) => {
            let _ = writeln!(out, "    {}: contract `{}` violated", failure.label(), violation.kind);
            for found in &violation.violations {
                let _ = writeln!(out, "      - {found}");
            }
        }
        other => {
            let _ = writeln!(out, "    {}: {other}", other.label());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
