// crates/contract-gate-core/src/core/response.rs
// ============================================================================
// Module: Normalized Responses
// Description: Transport-independent view of an answered HTTP call.
// Purpose: Give assertions a status code and a classified body.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ContractResponse`] exists only when the remote service answered. Calls
//! that produced no answer are reported as [`crate::TransportError`] instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Response body classified by content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// No body bytes were returned.
    Empty,
    /// Body parsed as JSON.
    Json(Value),
    /// Body returned as non-JSON text.
    Text(String),
}

impl ResponseBody {
    /// Returns the JSON payload when the body is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty | Self::Text(_) => None,
        }
    }

    /// Returns a short, bounded rendering for reports.
    #[must_use]
    pub fn summary(&self, max_chars: usize) -> String {
        let full = match self {
            Self::Empty => return "<empty>".to_string(),
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        };
        if full.chars().count() <= max_chars {
            return full;
        }
        let mut truncated: String = full.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Normalized response returned by every transport operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractResponse {
    /// HTTP status code.
    pub status: u16,
    /// Classified body.
    pub body: ResponseBody,
}

impl ContractResponse {
    /// Creates a response with a JSON body.
    #[must_use]
    pub const fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
        }
    }

    /// Creates a response without a body.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            body: ResponseBody::Empty,
        }
    }

    /// Returns true for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
