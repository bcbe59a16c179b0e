// crates/contract-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Contract Gate Interfaces
// Description: Backend-agnostic transport interface for the remote resource API.
// Purpose: Define the call surface used by fixtures, assertions, and scenarios.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The harness reaches the remote API only through [`ContractTransport`].
//! Implementations map each logical operation onto a request against a
//! configured endpoint and must keep two outcomes apart: an answered call is a
//! [`ContractResponse`] whatever its status, while a call that produced no
//! answer is a [`TransportError`]. Implementations never retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::AuthToken;
use crate::core::ContractResponse;
use crate::core::ResourceRecord;
use crate::core::ResourceStatus;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Logical operation names used in errors and events.
pub mod operation {
    /// Fetch a record by identifier.
    pub const GET_BY_ID: &str = "get_by_id";
    /// Create a record.
    pub const CREATE: &str = "create";
    /// Replace a record.
    pub const UPDATE: &str = "update";
    /// List records by status.
    pub const FIND_BY_STATUS: &str = "find_by_status";
    /// Delete a record by identifier.
    pub const DELETE_BY_ID: &str = "delete_by_id";
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A call that produced no usable response.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `operation` is one of the names in [`operation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The per-call timeout elapsed.
    #[error("{operation}: request timed out")]
    Timeout {
        /// Logical operation.
        operation: &'static str,
    },
    /// The connection could not be established.
    #[error("{operation}: connection failed: {message}")]
    Connect {
        /// Logical operation.
        operation: &'static str,
        /// Transport detail.
        message: String,
    },
    /// A response arrived but could not be interpreted.
    #[error("{operation}: malformed response: {message}")]
    Malformed {
        /// Logical operation.
        operation: &'static str,
        /// Transport detail.
        message: String,
    },
    /// The request could not be built.
    #[error("{operation}: request failed: {message}")]
    Request {
        /// Logical operation.
        operation: &'static str,
        /// Transport detail.
        message: String,
    },
}

impl TransportError {
    /// Returns the logical operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Timeout {
                operation,
            }
            | Self::Connect {
                operation, ..
            }
            | Self::Malformed {
                operation, ..
            }
            | Self::Request {
                operation, ..
            } => operation,
        }
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Call surface of the remote resource API.
///
/// Calls block the caller until a response arrives or the implementation's
/// per-call timeout elapses.
pub trait ContractTransport {
    /// Fetches the record with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    fn get_by_id(&self, id: i64) -> Result<ContractResponse, TransportError>;

    /// Creates `record`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    fn create(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError>;

    /// Replaces the record carrying `record.id`. No prior existence check is made.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    fn update(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError>;

    /// Lists records with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    fn find_by_status(&self, status: ResourceStatus) -> Result<ContractResponse, TransportError>;

    /// Deletes the record with identifier `id`, presenting `token`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was obtained.
    fn delete_by_id(&self, id: i64, token: &AuthToken)
    -> Result<ContractResponse, TransportError>;
}
