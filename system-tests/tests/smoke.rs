// system-tests/tests/smoke.rs
// ============================================================================
// Module: Smoke Suite
// Description: Aggregates catalog system tests into one binary.
// Purpose: Reduce binaries while keeping catalog coverage centralized.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates catalog system tests into one binary.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod helpers;

#[path = "suites/catalog.rs"]
mod catalog;
