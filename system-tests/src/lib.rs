// system-tests/src/lib.rs
// ============================================================================
// Module: Contract Gate System Tests Library
// Description: Shared configuration and the mock service for system tests.
// Purpose: Provide common utilities for Contract Gate system-test binaries.
// Dependencies: tiny_http, serde_json, url
// ============================================================================

//! ## Overview
//! This crate hosts the environment-backed test configuration and the
//! stateful mock pet store used by the system-test binaries in
//! `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod mock;
