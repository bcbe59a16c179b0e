// crates/contract-gate-core/src/runtime/fixtures.rs
// ============================================================================
// Module: Resource Fixture Manager
// Description: Creation and best-effort deletion of test-owned resources.
// Purpose: Guarantee scenario isolation and cleanup on every exit path.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`FixtureManager::provision`] creates a record and only hands out a
//! [`FixtureHandle`] once the service confirmed the creation.
//! [`FixtureManager::release`] deletes best-effort: a 404 means the fixture is
//! already gone, and any other failure becomes a [`FixtureLeakWarning`]
//! instead of an error so teardown never masks the scenario result.
//!
//! [`FixtureScope`] pairs the two. Handles acquired through a scope are
//! released in reverse order by [`FixtureScope::teardown`], or by `Drop` if the
//! scope is abandoned (including during a panic unwind).

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AuthToken;
use crate::core::FixtureLeakWarning;
use crate::core::FixtureProvisionError;
use crate::core::HarnessError;
use crate::core::ResourceKind;
use crate::core::ResourceRecord;
use crate::interfaces::ContractTransport;
use crate::runtime::events::EventSink;
use crate::runtime::events::HarnessEventKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters of a response body quoted in diagnostics.
pub(crate) const BODY_SUMMARY_CHARS: usize = 256;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Reference to a resource the harness owns on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureHandle {
    /// Resource kind.
    kind: ResourceKind,
    /// Resource identifier.
    id: i64,
}

impl FixtureHandle {
    /// Creates a handle for a resource the caller already created.
    #[must_use]
    pub const fn new(kind: ResourceKind, id: i64) -> Self {
        Self {
            kind,
            id,
        }
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Returns the resource identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }
}

/// Result of a best-effort release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The service confirmed deletion.
    Deleted,
    /// The service reported the resource absent.
    AlreadyAbsent,
    /// Deletion could not be confirmed.
    Leaked(FixtureLeakWarning),
}

impl ReleaseOutcome {
    /// Returns the leak warning, if any.
    #[must_use]
    pub fn into_leak(self) -> Option<FixtureLeakWarning> {
        match self {
            Self::Leaked(warning) => Some(warning),
            Self::Deleted | Self::AlreadyAbsent => None,
        }
    }
}

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Creates and deletes fixtures through a transport.
pub struct FixtureManager<'a> {
    /// Transport used for create and delete calls.
    transport: &'a dyn ContractTransport,
    /// Token presented on delete calls.
    token: AuthToken,
    /// Sink for lifecycle events.
    sink: &'a dyn EventSink,
}

impl<'a> FixtureManager<'a> {
    /// Creates a manager over `transport`.
    #[must_use]
    pub fn new(
        transport: &'a dyn ContractTransport,
        token: AuthToken,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            transport,
            token,
            sink,
        }
    }

    /// Creates `record` and returns its handle once creation is confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Transport`] when no response was obtained and
    /// [`HarnessError::FixtureProvision`] on any non-success status.
    pub fn provision(
        &self,
        kind: &ResourceKind,
        record: &ResourceRecord,
    ) -> Result<FixtureHandle, HarnessError> {
        let response = self.transport.create(record)?;
        if !response.is_success() {
            return Err(HarnessError::FixtureProvision(FixtureProvisionError {
                kind: kind.clone(),
                id: record.id,
                status: response.status,
                body: response.body.summary(BODY_SUMMARY_CHARS),
            }));
        }
        self.sink.emit(HarnessEventKind::FixtureProvisioned {
            kind: kind.clone(),
            id: record.id,
        });
        Ok(FixtureHandle::new(kind.clone(), record.id))
    }

    /// Deletes the fixture behind `handle`. Never fails; safe to repeat.
    pub fn release(&self, handle: &FixtureHandle) -> ReleaseOutcome {
        let outcome = match self.transport.delete_by_id(handle.id, &self.token) {
            Ok(response) if response.is_success() => ReleaseOutcome::Deleted,
            Ok(response) if response.status == 404 => ReleaseOutcome::AlreadyAbsent,
            Ok(response) => ReleaseOutcome::Leaked(FixtureLeakWarning {
                kind: handle.kind.clone(),
                id: handle.id,
                status: Some(response.status),
                detail: response.body.summary(BODY_SUMMARY_CHARS),
            }),
            Err(err) => ReleaseOutcome::Leaked(FixtureLeakWarning {
                kind: handle.kind.clone(),
                id: handle.id,
                status: None,
                detail: err.to_string(),
            }),
        };
        match &outcome {
            ReleaseOutcome::Deleted => self.sink.emit(HarnessEventKind::FixtureReleased {
                kind: handle.kind.clone(),
                id: handle.id,
                outcome: "deleted",
            }),
            ReleaseOutcome::AlreadyAbsent => self.sink.emit(HarnessEventKind::FixtureReleased {
                kind: handle.kind.clone(),
                id: handle.id,
                outcome: "already_absent",
            }),
            ReleaseOutcome::Leaked(warning) => self.sink.emit(HarnessEventKind::FixtureLeak {
                warning: warning.clone(),
            }),
        }
        outcome
    }

    /// Opens a scope whose fixtures are released when it ends.
    #[must_use]
    pub fn scope(&self) -> FixtureScope<'_> {
        FixtureScope {
            manager: self,
            handles: Vec::new(),
        }
    }

    /// Provisions `records`, runs `body`, and always releases the fixtures.
    ///
    /// Returns the body result together with any leak warnings. When
    /// provisioning fails the body is skipped and fixtures created so far are
    /// still released.
    pub fn with_fixtures<T>(
        &self,
        records: &[(ResourceKind, ResourceRecord)],
        body: impl FnOnce(&[FixtureHandle]) -> Result<T, HarnessError>,
    ) -> (Result<T, HarnessError>, Vec<FixtureLeakWarning>) {
        let mut scope = self.scope();
        let mut provisioned = Ok(());
        for (kind, record) in records {
            if let Err(err) = scope.provision(kind, record) {
                provisioned = Err(err);
                break;
            }
        }
        let result = provisioned.and_then(|()| body(scope.handles()));
        let leaks = scope.teardown();
        (result, leaks)
    }
}

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Fixtures owned by one scenario.
///
/// # Invariants
/// - Every handle held is released exactly once, by `teardown` or `Drop`.
pub struct FixtureScope<'m> {
    /// Manager performing the calls.
    manager: &'m FixtureManager<'m>,
    /// Handles in acquisition order.
    handles: Vec<FixtureHandle>,
}

impl FixtureScope<'_> {
    /// Provisions a fixture and takes ownership of it.
    ///
    /// # Errors
    ///
    /// Returns the error from [`FixtureManager::provision`].
    pub fn provision(
        &mut self,
        kind: &ResourceKind,
        record: &ResourceRecord,
    ) -> Result<FixtureHandle, HarnessError> {
        let handle = self.manager.provision(kind, record)?;
        self.handles.push(handle.clone());
        Ok(handle)
    }

    /// Takes ownership of a resource created outside the manager, such as one
    /// created by the operation under test.
    pub fn adopt(&mut self, handle: FixtureHandle) {
        if !self.handles.contains(&handle) {
            self.handles.push(handle);
        }
    }

    /// Returns the owned handles in acquisition order.
    #[must_use]
    pub fn handles(&self) -> &[FixtureHandle] {
        &self.handles
    }

    /// Releases every owned fixture in reverse order and returns the leaks.
    pub fn teardown(mut self) -> Vec<FixtureLeakWarning> {
        self.release_all()
    }

    /// Drains and releases the owned handles.
    fn release_all(&mut self) -> Vec<FixtureLeakWarning> {
        let mut leaks = Vec::new();
        while let Some(handle) = self.handles.pop() {
            if let Some(warning) = self.manager.release(&handle).into_leak() {
                leaks.push(warning);
            }
        }
        leaks
    }
}

impl Drop for FixtureScope<'_> {
    fn drop(&mut self) {
        let _ = self.release_all();
    }
}
