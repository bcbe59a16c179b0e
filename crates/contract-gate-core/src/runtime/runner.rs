// crates/contract-gate-core/src/runtime/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Sequential scenario execution with guaranteed teardown.
// Purpose: Produce one outcome per scenario without ever aborting the suite.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`SuiteRunner`] runs scenarios one at a time in declaration order. Each run
//! provisions the declared fixtures, executes the body, and always tears the
//! fixtures down. Fixture setup failures, transport failures, and assertion
//! failures are all recorded in the scenario's outcome.
//!
//! ## Invariants
//! - Scenarios never overlap; fixture identifiers may be shared across them.
//! - A passed scenario has reached [`ScenarioPhase::Validated`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use thiserror::Error;

use crate::core::AuthToken;
use crate::core::HarnessError;
use crate::core::SchemaRegistry;
use crate::interfaces::ContractTransport;
use crate::runtime::assertions::AssertionEngine;
use crate::runtime::events::EventSink;
use crate::runtime::events::HarnessEventKind;
use crate::runtime::fixtures::FixtureManager;
use crate::runtime::observed::ObservedTransport;
use crate::runtime::observed::duration_ms;
use crate::runtime::report::ScenarioOutcome;
use crate::runtime::report::SuiteReport;
use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::ScenarioContext;
use crate::runtime::scenario::ScenarioPhase;
use crate::runtime::scenario::ScenarioStatus;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A scenario filter named no known scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario `{0}`")]
pub struct UnknownScenario(pub String);

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs scenarios against one transport.
pub struct SuiteRunner<'a> {
    /// Contracts used by assertions.
    registry: &'a SchemaRegistry,
    /// Transport for every call.
    transport: &'a dyn ContractTransport,
    /// Token for authorized calls.
    token: AuthToken,
    /// Event destination.
    sink: &'a dyn EventSink,
}

impl<'a> SuiteRunner<'a> {
    /// Creates a runner.
    #[must_use]
    pub fn new(
        registry: &'a SchemaRegistry,
        transport: &'a dyn ContractTransport,
        token: AuthToken,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            registry,
            transport,
            token,
            sink,
        }
    }

    /// Runs every scenario in order.
    #[must_use]
    pub fn run(&self, scenarios: &[Scenario]) -> SuiteReport {
        self.run_selected(scenarios.iter())
    }

    /// Runs only the scenarios named in `names`, in declaration order. An empty
    /// filter runs everything.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownScenario`] when a name matches no scenario; nothing runs.
    pub fn run_filtered(
        &self,
        scenarios: &[Scenario],
        names: &[String],
    ) -> Result<SuiteReport, UnknownScenario> {
        if let Some(missing) =
            names.iter().find(|name| !scenarios.iter().any(|scenario| scenario.name() == *name))
        {
            return Err(UnknownScenario(missing.clone()));
        }
        Ok(self.run_selected(
            scenarios
                .iter()
                .filter(|scenario| names.is_empty() || names.iter().any(|n| n == scenario.name())),
        ))
    }

    /// Runs a single scenario and returns its outcome.
    #[must_use]
    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioOutcome {
        let started = Instant::now();
        let name = scenario.name();
        self.sink.emit(HarnessEventKind::ScenarioStarted {
            scenario: name.to_string(),
        });

        let observed = ObservedTransport::new(self.transport, self.sink, name);
        let manager = FixtureManager::new(&observed, self.token.clone(), self.sink);
        let assertions = AssertionEngine::new(self.registry, &observed);
        let mut context = ScenarioContext::new(
            name,
            &observed,
            assertions,
            manager.scope(),
            &self.token,
            self.sink,
        );

        let result = drive(scenario, &mut context);
        let observed_status = context.observed_status();
        let (phase_reached, leaks) = context.teardown();
        let failure = result.err();
        let status = if failure.is_some() { ScenarioStatus::Failed } else { ScenarioStatus::Passed };
        let duration_ms = duration_ms(started.elapsed());

        self.sink.emit(HarnessEventKind::ScenarioFinished {
            scenario: name.to_string(),
            status,
            failure: failure.as_ref().map(HarnessError::label),
            duration_ms,
        });
        ScenarioOutcome {
            name: name.to_string(),
            status,
            phase_reached,
            failure,
            observed_status,
            leaks,
            duration_ms,
        }
    }

    /// Runs the given scenarios and emits the suite summary.
    fn run_selected<'s>(&self, scenarios: impl Iterator<Item = &'s Scenario>) -> SuiteReport {
        let report = SuiteReport {
            outcomes: scenarios.map(|scenario| self.run_scenario(scenario)).collect(),
        };
        self.sink.emit(HarnessEventKind::SuiteFinished {
            total: report.total(),
            passed: report.passed(),
            failed: report.failed(),
            leaks: report.leak_count(),
        });
        report
    }
}

/// Provisions fixtures, runs the body, and checks the body completed.
fn drive(scenario: &Scenario, context: &mut ScenarioContext<'_>) -> Result<(), HarnessError> {
    for (kind, record) in scenario.fixtures() {
        context.provision(kind, record)?;
    }
    context.advance(ScenarioPhase::Provisioned)?;
    scenario.execute(context)?;
    if context.phase() != ScenarioPhase::Validated {
        return Err(HarnessError::PhaseViolation {
            from: context.phase(),
            to: ScenarioPhase::TornDown,
        });
    }
    Ok(())
}
