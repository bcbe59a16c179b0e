// crates/contract-gate-core/src/core/registry.rs
// ============================================================================
// Module: Schema Registry
// Description: Named contracts keyed by resource kind.
// Purpose: Resolve the contract for a kind and validate payloads against it.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The registry is populated while the harness is configured and is only read
//! once scenarios start. It is shared by reference, so no locking is needed.
//! Registering a kind twice replaces the earlier contract without error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::ResourceKind;
use crate::core::schema::SchemaContract;
use crate::core::schema::SchemaViolation;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource kind of the built-in pet contract.
pub const PET_KIND: &str = "pet";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry lookup and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No contract is registered for the kind.
    #[error("no contract registered for kind `{0}`")]
    UnknownContract(ResourceKind),
    /// The payload violates the registered contract.
    #[error("{0}")]
    Violation(SchemaViolation),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Contracts keyed by resource kind.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Registered contracts.
    contracts: BTreeMap<ResourceKind, SchemaContract>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in contracts.
    #[must_use]
    pub fn with_builtin_contracts() -> Self {
        let mut registry = Self::new();
        registry.register(ResourceKind::new(PET_KIND), SchemaContract::pet());
        registry
    }

    /// Stores `contract` under `kind`, replacing any earlier contract.
    pub fn register(&mut self, kind: ResourceKind, contract: SchemaContract) {
        self.contracts.insert(kind, contract);
    }

    /// Returns the contract registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: &ResourceKind) -> Option<&SchemaContract> {
        self.contracts.get(kind)
    }

    /// Returns the registered kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = &ResourceKind> {
        self.contracts.keys()
    }

    /// Validates `payload` against the contract registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownContract`] when `kind` is not
    /// registered and [`RegistryError::Violation`] listing every missing or
    /// mistyped field otherwise.
    pub fn validate(&self, kind: &ResourceKind, payload: &Value) -> Result<(), RegistryError> {
        let contract =
            self.get(kind).ok_or_else(|| RegistryError::UnknownContract(kind.clone()))?;
        let violations = contract.check(payload);
        if violations.is_empty() {
            return Ok(());
        }
        Err(RegistryError::Violation(SchemaViolation {
            kind: kind.clone(),
            violations,
        }))
    }
}
