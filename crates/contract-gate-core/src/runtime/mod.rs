// crates/contract-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Contract Gate Runtime
// Description: Fixture lifecycle, assertions, and scenario execution.
// Purpose: Run contract scenarios with isolated fixtures and full reporting.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime drives scenarios through their phases over a
//! [`crate::ContractTransport`], records [`HarnessEvent`] values to an
//! [`EventSink`], and collects a [`SuiteReport`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod assertions;
pub mod events;
pub mod fixtures;
mod observed;
pub mod petstore;
pub mod report;
pub mod runner;
pub mod scenario;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assertions::AssertionEngine;
pub use events::EventSink;
pub use events::FileEventSink;
pub use events::HarnessEvent;
pub use events::HarnessEventKind;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use fixtures::FixtureHandle;
pub use fixtures::FixtureManager;
pub use fixtures::FixtureScope;
pub use fixtures::ReleaseOutcome;
pub use report::ScenarioOutcome;
pub use report::SuiteReport;
pub use runner::SuiteRunner;
pub use runner::UnknownScenario;
pub use scenario::Scenario;
pub use scenario::ScenarioBody;
pub use scenario::ScenarioContext;
pub use scenario::ScenarioPhase;
pub use scenario::ScenarioStatus;
