// system-tests/tests/cli.rs
// ============================================================================
// Module: CLI Suite
// Description: Aggregates CLI end-to-end system tests into one binary.
// Purpose: Reduce binaries while keeping CLI end-to-end coverage centralized.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates CLI end-to-end system tests into one binary.

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

#[path = "suites/cli_exit_codes.rs"]
mod cli_exit_codes;
