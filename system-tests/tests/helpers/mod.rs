// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Contract Gate system-tests.
// Purpose: Provide the in-process harness, CLI resolution, and artifacts.
// Dependencies: system-tests, contract-gate-core, contract-gate-client
// ============================================================================

//! ## Overview
//! Shared helpers for Contract Gate system-tests. Suites start a
//! [`system_tests::mock::MockPetStore`], point the harness at it either
//! in-process ([`harness`]) or through the binary ([`cli`]), and keep the
//! rendered reports as artifacts ([`artifacts`]).

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod cli;
pub mod harness;
