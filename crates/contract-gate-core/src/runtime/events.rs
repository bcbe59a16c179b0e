// crates/contract-gate-core/src/runtime/events.rs
// ============================================================================
// Module: Harness Events
// Description: Structured run events and the sinks that record them.
// Purpose: Emit JSON-line logs for scenarios, requests, and fixtures.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every observable step of a run (scenario start and finish, phase changes,
//! transport calls, fixture lifecycle) is recorded as a [`HarnessEvent`] and
//! handed to an [`EventSink`]. Sinks serialize events as JSON lines and never
//! fail the run: write errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::FixtureLeakWarning;
use crate::core::ResourceKind;
use crate::runtime::scenario::ScenarioPhase;
use crate::runtime::scenario::ScenarioStatus;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HarnessEventKind {
    /// A scenario began.
    ScenarioStarted {
        /// Scenario name.
        scenario: String,
    },
    /// A scenario moved to a new phase.
    PhaseChanged {
        /// Scenario name.
        scenario: String,
        /// Phase entered.
        phase: ScenarioPhase,
    },
    /// A transport call completed.
    Request {
        /// Scenario name.
        scenario: String,
        /// Logical operation.
        operation: &'static str,
        /// Status received, when the service answered.
        status: Option<u16>,
        /// Transport error, when it did not.
        error: Option<String>,
        /// Wall-clock latency in milliseconds.
        elapsed_ms: u64,
    },
    /// A fixture was created.
    FixtureProvisioned {
        /// Fixture kind.
        kind: ResourceKind,
        /// Fixture identifier.
        id: i64,
    },
    /// A fixture was confirmed absent after teardown.
    FixtureReleased {
        /// Fixture kind.
        kind: ResourceKind,
        /// Fixture identifier.
        id: i64,
        /// `deleted` or `already_absent`.
        outcome: &'static str,
    },
    /// A fixture could not be confirmed deleted.
    FixtureLeak {
        /// Leak detail.
        warning: FixtureLeakWarning,
    },
    /// A scenario finished.
    ScenarioFinished {
        /// Scenario name.
        scenario: String,
        /// Final status.
        status: ScenarioStatus,
        /// Failure label when failed.
        failure: Option<&'static str>,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// The whole suite finished.
    SuiteFinished {
        /// Scenario count.
        total: usize,
        /// Passed scenario count.
        passed: usize,
        /// Failed scenario count.
        failed: usize,
        /// Leak warning count.
        leaks: usize,
    },
}

impl HarnessEventKind {
    /// Returns the stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScenarioStarted {
                ..
            } => "scenario_started",
            Self::PhaseChanged {
                ..
            } => "phase_changed",
            Self::Request {
                ..
            } => "request",
            Self::FixtureProvisioned {
                ..
            } => "fixture_provisioned",
            Self::FixtureReleased {
                ..
            } => "fixture_released",
            Self::FixtureLeak {
                ..
            } => "fixture_leak",
            Self::ScenarioFinished {
                ..
            } => "scenario_finished",
            Self::SuiteFinished {
                ..
            } => "suite_finished",
        }
    }
}

/// Timestamped harness event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event payload.
    #[serde(flatten)]
    pub kind: HarnessEventKind,
}

impl HarnessEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(kind: HarnessEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for harness events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &HarnessEvent);

    /// Convenience wrapper that stamps and records an event payload.
    fn emit(&self, kind: HarnessEventKind) {
        self.record(&HarnessEvent::new(kind));
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &HarnessEvent) {}
}

/// Event sink that keeps events in memory for inspection.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Captured events in emission order.
    events: Mutex<Vec<HarnessEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the captured events.
    #[must_use]
    pub fn events(&self) -> Vec<HarnessEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the names of the captured events in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .map(|events| events.iter().map(|event| event.kind.name()).collect())
            .unwrap_or_default()
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
