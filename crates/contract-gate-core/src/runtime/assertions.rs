// crates/contract-gate-core/src/runtime/assertions.rs
// ============================================================================
// Module: Assertion Engine
// Description: Status-code and payload-shape checks over normalized responses.
// Purpose: Turn every contract breach into a typed, fully detailed failure.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Assertions are pure checks: the only remote call they make is the read in
//! [`AssertionEngine::expect_absence`], and they never mutate remote state.
//! Every violation is reported; nothing is downgraded to a warning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::ContractResponse;
use crate::core::FieldViolation;
use crate::core::HarnessError;
use crate::core::ResourceKind;
use crate::core::ResponseBody;
use crate::core::SchemaRegistry;
use crate::core::SchemaViolation;
use crate::core::schema::json_type_label;
use crate::interfaces::ContractTransport;
use crate::runtime::fixtures::BODY_SUMMARY_CHARS;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Check functions bound to a schema registry and a transport.
#[derive(Clone, Copy)]
pub struct AssertionEngine<'a> {
    /// Contracts used for shape validation.
    registry: &'a SchemaRegistry,
    /// Transport used for absence checks.
    transport: &'a dyn ContractTransport,
}

impl<'a> AssertionEngine<'a> {
    /// Creates an engine over `registry` and `transport`.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry, transport: &'a dyn ContractTransport) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Requires the response status to be one of `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnexpectedStatus`] when it is not.
    pub fn expect_status(
        &self,
        response: &ContractResponse,
        expected: &[u16],
    ) -> Result<(), HarnessError> {
        if expected.contains(&response.status) {
            return Ok(());
        }
        Err(HarnessError::UnexpectedStatus {
            got: response.status,
            expected: expected.to_vec(),
            body: response.body.summary(BODY_SUMMARY_CHARS),
        })
    }

    /// Validates a body against the contract registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnknownContract`] for unregistered kinds and
    /// [`HarnessError::SchemaViolation`] listing every violation otherwise.
    pub fn expect_shape(&self, kind: &ResourceKind, body: &ResponseBody) -> Result<(), HarnessError> {
        let payload = self.json_payload(kind, body)?;
        self.registry.validate(kind, payload).map_err(HarnessError::from)
    }

    /// Requires a JSON array body and validates each element against `kind`.
    ///
    /// Violations are collected across all elements and located by index.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnknownContract`] for unregistered kinds and
    /// [`HarnessError::SchemaViolation`] listing every violation otherwise.
    pub fn expect_each_shape(
        &self,
        kind: &ResourceKind,
        body: &ResponseBody,
    ) -> Result<(), HarnessError> {
        let payload = self.json_payload(kind, body)?;
        let contract = self
            .registry
            .get(kind)
            .ok_or_else(|| HarnessError::UnknownContract(kind.clone()))?;
        let Value::Array(items) = payload else {
            return Err(violation(
                kind,
                vec![FieldViolation::NotAnArray {
                    path: String::new(),
                    actual: json_type_label(payload),
                }],
            ));
        };
        let violations: Vec<FieldViolation> = items
            .iter()
            .enumerate()
            .flat_map(|(index, item)| {
                contract.check(item).into_iter().map(move |found| found.at_index(index))
            })
            .collect();
        if violations.is_empty() { Ok(()) } else { Err(violation(kind, violations)) }
    }

    /// Checks the status and, only for success responses, the body shape.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn expect_response(
        &self,
        kind: &ResourceKind,
        response: &ContractResponse,
        expected: &[u16],
    ) -> Result<(), HarnessError> {
        self.expect_status(response, expected)?;
        if response.is_success() {
            self.expect_shape(kind, &response.body)?;
        }
        Ok(())
    }

    /// Requires each `(field, value)` pair to be echoed back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SchemaViolation`] listing every mismatch.
    pub fn expect_fields(
        &self,
        kind: &ResourceKind,
        body: &ResponseBody,
        expected: &[(&str, Value)],
    ) -> Result<(), HarnessError> {
        let payload = self.json_payload(kind, body)?;
        let violations: Vec<FieldViolation> = expected
            .iter()
            .filter_map(|(field, value)| {
                let actual = payload.get(*field);
                (actual != Some(value)).then(|| FieldViolation::FieldMismatch {
                    field: (*field).to_string(),
                    expected: value.clone(),
                    actual: actual.cloned(),
                })
            })
            .collect();
        if violations.is_empty() { Ok(()) } else { Err(violation(kind, violations)) }
    }

    /// Requires a single echoed `field` to equal `value`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SchemaViolation`] with a `FieldMismatch`.
    pub fn expect_field(
        &self,
        kind: &ResourceKind,
        body: &ResponseBody,
        field: &str,
        value: Value,
    ) -> Result<(), HarnessError> {
        self.expect_fields(kind, body, &[(field, value)])
    }

    /// Reads the `kind` record `id` and requires a 404.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnknownContract`] for unregistered kinds,
    /// [`HarnessError::Transport`] when the read produced no response, and
    /// [`HarnessError::UnexpectedStatus`] when the resource still exists.
    pub fn expect_absence(&self, kind: &ResourceKind, id: i64) -> Result<(), HarnessError> {
        if self.registry.get(kind).is_none() {
            return Err(HarnessError::UnknownContract(kind.clone()));
        }
        let response = self.transport.get_by_id(id)?;
        self.expect_status(&response, &[404])
    }

    /// Returns the JSON payload or a `NotJson` violation.
    fn json_payload<'b>(
        &self,
        kind: &ResourceKind,
        body: &'b ResponseBody,
    ) -> Result<&'b Value, HarnessError> {
        if self.registry.get(kind).is_none() {
            return Err(HarnessError::UnknownContract(kind.clone()));
        }
        match body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty => Err(violation(
                kind,
                vec![FieldViolation::NotJson {
                    actual: "empty",
                }],
            )),
            ResponseBody::Text(_) => Err(violation(
                kind,
                vec![FieldViolation::NotJson {
                    actual: "text",
                }],
            )),
        }
    }
}

/// Wraps violations as a schema failure for `kind`.
fn violation(kind: &ResourceKind, violations: Vec<FieldViolation>) -> HarnessError {
    HarnessError::SchemaViolation(SchemaViolation {
        kind: kind.clone(),
        violations,
    })
}
