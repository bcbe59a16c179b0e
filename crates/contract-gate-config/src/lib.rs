// crates/contract-gate-config/src/lib.rs
// ============================================================================
// Module: Contract Gate Config Library
// Description: Configuration model, loading, and validation.
// Purpose: Single source of truth for contract-gate.toml semantics.
// Dependencies: contract-gate-core, contract-gate-client, serde, toml, url
// ============================================================================

//! ## Overview
//! `contract-gate-config` loads `contract-gate.toml`, layers environment
//! overrides on top, and validates the result before anything talks to the
//! service. It also turns a validated config into the runtime pieces the
//! harness needs: client settings, the schema registry, and the event sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
