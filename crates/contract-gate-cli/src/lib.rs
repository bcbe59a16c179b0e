// crates/contract-gate-cli/src/lib.rs
// ============================================================================
// Module: Contract Gate CLI Library
// Description: Shared helpers for the Contract Gate command-line interface.
// Purpose: Keep report rendering and exit-code policy testable outside main.
// Dependencies: contract-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) parses arguments and wires the
//! runtime together; this library holds the pieces with observable output:
//! report rendering in text or JSON, the scenario listing, and the mapping
//! from suite results to process exit codes.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Report rendering and exit-code policy.
pub mod output;
