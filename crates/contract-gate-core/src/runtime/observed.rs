// crates/contract-gate-core/src/runtime/observed.rs
// ============================================================================
// Module: Observed Transport
// Description: Transport decorator that times and records every call.
// Purpose: Emit one request event per call without touching transports.
// Dependencies: crate::{core, interfaces, runtime::events}
// ============================================================================

//! ## Overview
//! [`ObservedTransport`] wraps the transport handed to the runner. Each call is
//! forwarded unchanged, timed, and reported as a `request` event tagged with
//! the scenario name. The last answered status is kept so the runner can
//! report what the operation under test returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::time::Duration;
use std::time::Instant;

use crate::core::AuthToken;
use crate::core::ContractResponse;
use crate::core::ResourceRecord;
use crate::core::ResourceStatus;
use crate::interfaces::ContractTransport;
use crate::interfaces::TransportError;
use crate::interfaces::operation;
use crate::runtime::events::EventSink;
use crate::runtime::events::HarnessEventKind;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport wrapper emitting `request` events.
pub(crate) struct ObservedTransport<'a> {
    /// Wrapped transport.
    inner: &'a dyn ContractTransport,
    /// Event destination.
    sink: &'a dyn EventSink,
    /// Scenario name attached to events.
    scenario: &'a str,
    /// Status of the most recent answered call.
    last_status: Cell<Option<u16>>,
}

impl<'a> ObservedTransport<'a> {
    /// Wraps `inner` for the scenario named `scenario`.
    pub(crate) fn new(
        inner: &'a dyn ContractTransport,
        sink: &'a dyn EventSink,
        scenario: &'a str,
    ) -> Self {
        Self {
            inner,
            sink,
            scenario,
            last_status: Cell::new(None),
        }
    }

    /// Returns the status of the most recent answered call.
    pub(crate) fn last_status(&self) -> Option<u16> {
        self.last_status.get()
    }

    /// Times `call` and records its outcome.
    fn observe(
        &self,
        name: &'static str,
        call: impl FnOnce() -> Result<ContractResponse, TransportError>,
    ) -> Result<ContractResponse, TransportError> {
        let started = Instant::now();
        let result = call();
        let elapsed_ms = duration_ms(started.elapsed());
        let (status, error) = match &result {
            Ok(response) => (Some(response.status), None),
            Err(err) => (None, Some(err.to_string())),
        };
        if status.is_some() {
            self.last_status.set(status);
        }
        self.sink.emit(HarnessEventKind::Request {
            scenario: self.scenario.to_string(),
            operation: name,
            status,
            error,
            elapsed_ms,
        });
        result
    }
}

impl ContractTransport for ObservedTransport<'_> {
    fn get_by_id(&self, id: i64) -> Result<ContractResponse, TransportError> {
        self.observe(operation::GET_BY_ID, || self.inner.get_by_id(id))
    }

    fn create(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        self.observe(operation::CREATE, || self.inner.create(record))
    }

    fn update(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        self.observe(operation::UPDATE, || self.inner.update(record))
    }

    fn find_by_status(&self, status: ResourceStatus) -> Result<ContractResponse, TransportError> {
        self.observe(operation::FIND_BY_STATUS, || self.inner.find_by_status(status))
    }

    fn delete_by_id(
        &self,
        id: i64,
        token: &AuthToken,
    ) -> Result<ContractResponse, TransportError> {
        self.observe(operation::DELETE_BY_ID, || self.inner.delete_by_id(id, token))
    }
}

/// Converts a duration to whole milliseconds, saturating.
pub(crate) fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
