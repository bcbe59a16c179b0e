// crates/contract-gate-core/src/lib.rs
// ============================================================================
// Module: Contract Gate Core Library
// Description: Public API surface for the Contract Gate core.
// Purpose: Expose contract types, transport interfaces, and the scenario runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Contract Gate core verifies a remote CRUD resource API against declared
//! contracts. It owns the schema registry, the fixture lifecycle, the assertion
//! checks, and the sequential scenario runner. Network access happens only
//! through the [`ContractTransport`] interface so the runtime stays
//! transport-agnostic and testable without a live service.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::ContractTransport;
pub use interfaces::TransportError;
pub use runtime::AssertionEngine;
pub use runtime::EventSink;
pub use runtime::FileEventSink;
pub use runtime::FixtureHandle;
pub use runtime::FixtureManager;
pub use runtime::FixtureScope;
pub use runtime::HarnessEvent;
pub use runtime::HarnessEventKind;
pub use runtime::MemoryEventSink;
pub use runtime::NoopEventSink;
pub use runtime::ReleaseOutcome;
pub use runtime::Scenario;
pub use runtime::ScenarioContext;
pub use runtime::ScenarioOutcome;
pub use runtime::ScenarioPhase;
pub use runtime::ScenarioStatus;
pub use runtime::StderrEventSink;
pub use runtime::SuiteReport;
pub use runtime::SuiteRunner;
pub use runtime::UnknownScenario;
