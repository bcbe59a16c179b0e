// crates/contract-gate-core/src/runtime/scenario.rs
// ============================================================================
// Module: Scenario Model
// Description: Scenario definitions, phases, and the per-run context.
// Purpose: Enforce the provision, exercise, validate, teardown ordering.
// Dependencies: crate::{core, interfaces, runtime}, serde
// ============================================================================

//! ## Overview
//! A [`Scenario`] declares the fixtures it needs and a body that exercises one
//! operation and validates the result. The body receives a
//! [`ScenarioContext`] exposing the transport, the assertion engine, and the
//! fixture scope. Phases only move forward:
//!
//! ```text
//! Pending -> Provisioned -> Exercised -> Validated -> TornDown
//! ```
//!
//! `TornDown` is reachable from every phase so cleanup always runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::core::AuthToken;
use crate::core::FixtureLeakWarning;
use crate::core::HarnessError;
use crate::core::ResourceKind;
use crate::core::ResourceRecord;
use crate::interfaces::ContractTransport;
use crate::runtime::assertions::AssertionEngine;
use crate::runtime::events::EventSink;
use crate::runtime::events::HarnessEventKind;
use crate::runtime::fixtures::FixtureHandle;
use crate::runtime::fixtures::FixtureScope;
use crate::runtime::observed::ObservedTransport;

// ============================================================================
// SECTION: Phases
// ============================================================================

/// Lifecycle phase of a running scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPhase {
    /// Not started.
    Pending,
    /// Fixtures exist.
    Provisioned,
    /// The operation under test was called.
    Exercised,
    /// Assertions passed.
    Validated,
    /// Fixtures were released.
    TornDown,
}

impl ScenarioPhase {
    /// Returns the stable phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Provisioned => "provisioned",
            Self::Exercised => "exercised",
            Self::Validated => "validated",
            Self::TornDown => "torn_down",
        }
    }

    /// Returns true when `next` may follow this phase.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Provisioned)
                | (Self::Provisioned, Self::Exercised)
                | (Self::Exercised, Self::Validated)
                | (Self::Pending | Self::Provisioned | Self::Exercised | Self::Validated, Self::TornDown)
        )
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final scenario status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Every check held.
    Passed,
    /// A check or setup step failed.
    Failed,
}

impl ScenarioStatus {
    /// Returns the stable status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Scenario body signature.
pub type ScenarioBody =
    Box<dyn Fn(&mut ScenarioContext<'_>) -> Result<(), HarnessError> + Send + Sync>;

/// One named contract check.
pub struct Scenario {
    /// Unique scenario name.
    name: String,
    /// One-line description.
    description: String,
    /// Fixtures provisioned before the body runs, in order.
    fixtures: Vec<(ResourceKind, ResourceRecord)>,
    /// Exercise and validate steps.
    body: ScenarioBody,
}

impl Scenario {
    /// Creates a scenario without fixtures.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        body: impl Fn(&mut ScenarioContext<'_>) -> Result<(), HarnessError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fixtures: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Adds a fixture provisioned before the body runs.
    #[must_use]
    pub fn with_fixture(mut self, kind: impl Into<ResourceKind>, record: ResourceRecord) -> Self {
        self.fixtures.push((kind.into(), record));
        self
    }

    /// Returns the scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scenario description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared fixtures.
    #[must_use]
    pub fn fixtures(&self) -> &[(ResourceKind, ResourceRecord)] {
        &self.fixtures
    }

    /// Runs the body against `context`.
    pub(crate) fn execute(&self, context: &mut ScenarioContext<'_>) -> Result<(), HarnessError> {
        (self.body)(context)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fixtures", &self.fixtures)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// State a scenario body works against.
///
/// # Invariants
/// - `phase` only moves along [`ScenarioPhase::can_advance_to`].
pub struct ScenarioContext<'a> {
    /// Scenario name.
    name: &'a str,
    /// Observed transport.
    transport: &'a ObservedTransport<'a>,
    /// Assertion engine over the observed transport.
    assertions: AssertionEngine<'a>,
    /// Fixtures owned by this run.
    scope: FixtureScope<'a>,
    /// Token for authorized calls.
    token: &'a AuthToken,
    /// Current phase.
    phase: ScenarioPhase,
    /// Event destination.
    sink: &'a dyn EventSink,
    /// Status returned by the operation under test.
    observed_status: Option<u16>,
}

impl<'a> ScenarioContext<'a> {
    /// Creates a context in the `Pending` phase.
    pub(crate) fn new(
        name: &'a str,
        transport: &'a ObservedTransport<'a>,
        assertions: AssertionEngine<'a>,
        scope: FixtureScope<'a>,
        token: &'a AuthToken,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            name,
            transport,
            assertions,
            scope,
            token,
            phase: ScenarioPhase::Pending,
            sink,
            observed_status: None,
        }
    }

    /// Returns the transport for the operation under test.
    #[must_use]
    pub fn transport(&self) -> &dyn ContractTransport {
        self.transport
    }

    /// Returns the assertion engine.
    #[must_use]
    pub const fn assertions(&self) -> &AssertionEngine<'a> {
        &self.assertions
    }

    /// Returns the token for authorized calls.
    #[must_use]
    pub const fn auth_token(&self) -> &AuthToken {
        self.token
    }

    /// Returns the `index`-th fixture handle.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Scenario`] when no such fixture exists.
    pub fn fixture(&self, index: usize) -> Result<&FixtureHandle, HarnessError> {
        self.scope
            .handles()
            .get(index)
            .ok_or_else(|| HarnessError::Scenario(format!("fixture {index} was not provisioned")))
    }

    /// Takes ownership of a record created by the operation under test.
    pub fn adopt(&mut self, kind: impl Into<ResourceKind>, id: i64) {
        self.scope.adopt(FixtureHandle::new(kind.into(), id));
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// Returns the status the operation under test answered with.
    #[must_use]
    pub const fn observed_status(&self) -> Option<u16> {
        self.observed_status
    }

    /// Marks the operation under test as called.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::PhaseViolation`] out of order.
    pub fn exercised(&mut self) -> Result<(), HarnessError> {
        self.advance(ScenarioPhase::Exercised)?;
        self.observed_status = self.transport.last_status();
        Ok(())
    }

    /// Marks every assertion as passed.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::PhaseViolation`] out of order.
    pub fn validated(&mut self) -> Result<(), HarnessError> {
        self.advance(ScenarioPhase::Validated)
    }

    /// Moves to `next`.
    pub(crate) fn advance(&mut self, next: ScenarioPhase) -> Result<(), HarnessError> {
        if !self.phase.can_advance_to(next) {
            return Err(HarnessError::PhaseViolation {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        self.sink.emit(HarnessEventKind::PhaseChanged {
            scenario: self.name.to_string(),
            phase: next,
        });
        Ok(())
    }

    /// Provisions a fixture into this context's scope.
    pub(crate) fn provision(
        &mut self,
        kind: &ResourceKind,
        record: &ResourceRecord,
    ) -> Result<FixtureHandle, HarnessError> {
        self.scope.provision(kind, record)
    }

    /// Releases every fixture; returns the phase reached before teardown and
    /// the leak warnings.
    pub(crate) fn teardown(mut self) -> (ScenarioPhase, Vec<FixtureLeakWarning>) {
        let reached = self.phase;
        let _ = self.advance(ScenarioPhase::TornDown);
        (reached, self.scope.teardown())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
