// crates/contract-gate-core/src/core/error.rs
// ============================================================================
// Module: Harness Error Taxonomy
// Description: Failure classes recorded against scenarios.
// Purpose: Separate "no answer", "wrong answer", and "setup failed" outcomes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`HarnessError`] aborts the current scenario and is recorded in its outcome;
//! it never aborts the suite. Teardown problems are not errors: they surface
//! as [`FixtureLeakWarning`] values so they cannot mask the real assertion
//! outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ResourceKind;
use crate::core::registry::RegistryError;
use crate::core::schema::SchemaViolation;
use crate::interfaces::TransportError;
use crate::runtime::ScenarioPhase;

// ============================================================================
// SECTION: Fixture Diagnostics
// ============================================================================

/// Fixture creation was answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureProvisionError {
    /// Fixture resource kind.
    pub kind: ResourceKind,
    /// Fixture identifier.
    pub id: i64,
    /// Status received.
    pub status: u16,
    /// Bounded rendering of the response body.
    pub body: String,
}

impl fmt::Display for FixtureProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fixture {} {} could not be provisioned: status {} body {}",
            self.kind, self.id, self.status, self.body
        )
    }
}

/// Fixture teardown did not confirm deletion.
///
/// # Invariants
/// - `status` is `None` only when the delete call produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureLeakWarning {
    /// Fixture resource kind.
    pub kind: ResourceKind,
    /// Fixture identifier.
    pub id: i64,
    /// Status received, when the service answered.
    pub status: Option<u16>,
    /// Human-readable detail.
    pub detail: String,
}

impl fmt::Display for FixtureLeakWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "fixture {} {} may have leaked: delete returned {status} ({})",
                self.kind, self.id, self.detail
            ),
            None => write!(
                f,
                "fixture {} {} may have leaked: {}",
                self.kind, self.id, self.detail
            ),
        }
    }
}

// ============================================================================
// SECTION: Harness Errors
// ============================================================================

/// Scenario failure taxonomy.
///
/// # Invariants
/// - Variants are stable for report labeling via [`HarnessError::label`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// No response was obtained.
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// A response was obtained with a status outside the expected set.
    #[error("unexpected status {got} (expected one of {}); body {body}", join_statuses(.expected))]
    UnexpectedStatus {
        /// Status received.
        got: u16,
        /// Allowed statuses.
        expected: Vec<u16>,
        /// Bounded rendering of the response body.
        body: String,
    },
    /// The response body does not satisfy its contract.
    #[error("{0}")]
    SchemaViolation(SchemaViolation),
    /// Validation referenced a kind with no registered contract.
    #[error("no contract registered for kind `{0}`")]
    UnknownContract(ResourceKind),
    /// Fixture setup failed; the scenario cannot proceed.
    #[error("{0}")]
    FixtureProvision(FixtureProvisionError),
    /// A scenario attempted an out-of-order phase transition.
    #[error("invalid phase transition from {from} to {to}")]
    PhaseViolation {
        /// Phase the scenario was in.
        from: ScenarioPhase,
        /// Phase that was requested.
        to: ScenarioPhase,
    },
    /// Scenario-specific check failed.
    #[error("{0}")]
    Scenario(String),
}

impl HarnessError {
    /// Returns a stable snake_case label for reports and events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_error",
            Self::UnexpectedStatus {
                ..
            } => "unexpected_status",
            Self::SchemaViolation(_) => "schema_violation",
            Self::UnknownContract(_) => "unknown_contract",
            Self::FixtureProvision(_) => "fixture_provision_error",
            Self::PhaseViolation {
                ..
            } => "phase_violation",
            Self::Scenario(_) => "scenario_error",
        }
    }
}

/// Renders a status set as `404, 200`.
fn join_statuses(statuses: &[u16]) -> String {
    statuses.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
}

impl From<RegistryError> for HarnessError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::UnknownContract(kind) => Self::UnknownContract(kind),
            RegistryError::Violation(violation) => Self::SchemaViolation(violation),
        }
    }
}
