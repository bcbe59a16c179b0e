// crates/contract-gate-client/src/lib.rs
// ============================================================================
// Module: Contract Gate Client Library
// Description: HTTP transport implementation for Contract Gate.
// Purpose: Reach the remote resource API over bounded blocking HTTP.
// Dependencies: contract-gate-core, reqwest
// ============================================================================

//! ## Overview
//! `contract-gate-client` provides [`HttpContractClient`], the production
//! [`contract_gate_core::ContractTransport`]. Tests substitute in-memory
//! transports; nothing else in the workspace performs network I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::API_KEY_HEADER;
pub use http::ClientError;
pub use http::DEFAULT_BASE_URL;
pub use http::DEFAULT_MAX_RESPONSE_BYTES;
pub use http::DEFAULT_TIMEOUT_MS;
pub use http::HttpClientConfig;
pub use http::HttpContractClient;
