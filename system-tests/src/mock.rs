// system-tests/src/mock.rs
// ============================================================================
// Module: Mock Pet Store
// Description: Stateful in-process pet store served over HTTP.
// Purpose: Give end-to-end suites a deterministic service with injectable drift.
// Dependencies: tiny_http, serde_json
// ============================================================================

//! ## Overview
//! [`MockPetStore`] serves the pet resource API on an ephemeral loopback port
//! from a background thread. Records live in memory and behave like the public
//! service: create and update are upserts that echo the record, lookups of
//! unknown ids answer 404, and deletes require the `api_key` header.
//!
//! [`Drift`] bends responses away from the contract so suites can prove the
//! harness notices: dropped or retyped fields, updates that are silently
//! ignored, and deletes that fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Method;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path prefix the mock serves under.
pub const BASE_PATH: &str = "/v2";
/// Delete token the mock accepts unless configured otherwise.
pub const DEFAULT_API_KEY: &str = "special-key";

// ============================================================================
// SECTION: Drift
// ============================================================================

/// Deviations from the contract applied to record responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drift {
    /// Fields removed from every record in a response.
    pub drop_fields: Vec<String>,
    /// Fields replaced with a fixed value in every record in a response.
    pub override_fields: Vec<(String, Value)>,
    /// Updates are acknowledged with the stored record but not applied.
    pub ignore_updates: bool,
    /// Status returned by every delete instead of performing it.
    pub delete_status: Option<u16>,
    /// Status returned by every create instead of storing the record.
    pub create_status: Option<u16>,
}

impl Drift {
    /// Drift that drops `field` from record responses.
    #[must_use]
    pub fn drop_field(field: &str) -> Self {
        Self {
            drop_fields: vec![field.to_string()],
            ..Self::default()
        }
    }

    /// Drift that replaces `field` with `value` in record responses.
    #[must_use]
    pub fn override_field(field: &str, value: Value) -> Self {
        Self {
            override_fields: vec![(field.to_string(), value)],
            ..Self::default()
        }
    }

    /// Applies record-level drift to one record.
    fn apply(&self, record: &mut Value) {
        if let Value::Object(map) = record {
            for field in &self.drop_fields {
                map.remove(field);
            }
            for (field, value) in &self.override_fields {
                map.insert(field.clone(), value.clone());
            }
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// One request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub url: String,
}

/// Mutable store state shared with the server thread.
#[derive(Debug, Default)]
struct StoreState {
    /// Records keyed by id.
    records: BTreeMap<i64, Value>,
    /// Active drift.
    drift: Drift,
    /// Requests in arrival order.
    seen: Vec<SeenRequest>,
    /// Accepted delete token.
    api_key: String,
}

/// Response shape produced by routing.
struct Reply {
    /// HTTP status.
    status: u16,
    /// JSON body; `None` means an empty body.
    body: Option<Value>,
}

impl Reply {
    /// JSON reply.
    const fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Empty-body reply.
    const fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
        }
    }

    /// Error envelope the public service uses.
    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({"code": 1, "type": "error", "message": message}))
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// In-process pet store bound to an ephemeral loopback port.
///
/// # Invariants
/// - The server thread stops when the store is dropped.
pub struct MockPetStore {
    /// Underlying HTTP server.
    server: Arc<Server>,
    /// Shared state.
    state: Arc<Mutex<StoreState>>,
    /// Base URL including [`BASE_PATH`].
    base_url: String,
    /// Server thread handle.
    handle: Option<JoinHandle<()>>,
}

impl MockPetStore {
    /// Starts an empty store with no drift.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub fn start() -> Result<Self, String> {
        Self::start_with(Drift::default())
    }

    /// Starts an empty store with `drift` applied.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub fn start_with(drift: Drift) -> Result<Self, String> {
        let server = Server::http("127.0.0.1:0").map_err(|err| format!("bind mock: {err}"))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| "mock listener has no ip address".to_string())?;
        let server = Arc::new(server);
        let state = Arc::new(Mutex::new(StoreState {
            drift,
            api_key: DEFAULT_API_KEY.to_string(),
            ..StoreState::default()
        }));
        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || serve(&server, &state))
        };
        Ok(Self {
            server,
            state,
            base_url: format!("http://{addr}{BASE_PATH}"),
            handle: Some(handle),
        })
    }

    /// Base URL to point the harness at.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Inserts or replaces a record directly.
    pub fn seed(&self, record: Value) {
        if let Some(id) = record.get("id").and_then(Value::as_i64) {
            self.with_state(|state| {
                state.records.insert(id, record);
            });
        }
    }

    /// Returns a stored record.
    #[must_use]
    pub fn record(&self, id: i64) -> Option<Value> {
        self.with_state(|state| state.records.get(&id).cloned())
    }

    /// Returns the stored ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.with_state(|state| state.records.keys().copied().collect())
    }

    /// Replaces the active drift.
    pub fn set_drift(&self, drift: Drift) {
        self.with_state(|state| state.drift = drift);
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.with_state(|state| state.seen.clone())
    }

    /// Runs `f` with the state locked, recovering from a poisoned lock.
    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl Drop for MockPetStore {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Serves requests until the server is unblocked.
fn serve(server: &Server, state: &Mutex<StoreState>) {
    while let Ok(mut request) = server.recv() {
        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);
        let api_key = header_value(&request, "api_key");
        let reply = {
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            guard.seen.push(SeenRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
            });
            route(&mut guard, request.method(), request.url(), &body, api_key.as_deref())
        };
        let _ = request.respond(into_response(reply));
    }
}

/// Dispatches one request against the store.
fn route(
    state: &mut StoreState,
    method: &Method,
    url: &str,
    body: &str,
    api_key: Option<&str>,
) -> Reply {
    let Some(rest) = url.strip_prefix(BASE_PATH).and_then(|rest| rest.strip_prefix("/pet")) else {
        return Reply::error(404, "unknown path");
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    match (method, path) {
        (Method::Post, "" | "/") => upsert(state, body, false),
        (Method::Put, "" | "/") => upsert(state, body, true),
        (Method::Get, "/findByStatus") => find_by_status(state, query),
        (Method::Get, id) => with_id(id, |id| get(state, id)),
        (Method::Delete, id) => with_id(id, |id| delete(state, id, api_key)),
        _ => Reply::error(405, "method not allowed"),
    }
}

/// Parses `/{id}` and hands the id to `f`.
fn with_id(segment: &str, f: impl FnOnce(i64) -> Reply) -> Reply {
    segment
        .strip_prefix('/')
        .and_then(|raw| raw.parse::<i64>().ok())
        .map_or_else(|| Reply::error(400, "invalid ID supplied"), f)
}

/// Handles `GET /pet/{id}`.
fn get(state: &StoreState, id: i64) -> Reply {
    state.records.get(&id).map_or_else(
        || Reply::error(404, "Pet not found"),
        |record| {
            let mut record = record.clone();
            state.drift.apply(&mut record);
            Reply::json(200, record)
        },
    )
}

/// Handles `POST /pet` and `PUT /pet`.
fn upsert(state: &mut StoreState, body: &str, is_update: bool) -> Reply {
    if !is_update && let Some(status) = state.drift.create_status {
        return Reply::error(status, "create rejected");
    }
    let Ok(record) = serde_json::from_str::<Value>(body) else {
        return Reply::error(400, "invalid input");
    };
    let Some(id) = record.get("id").and_then(Value::as_i64) else {
        return Reply::error(400, "invalid input");
    };
    let stored = if is_update && state.drift.ignore_updates && state.records.contains_key(&id) {
        state.records.get(&id).cloned().unwrap_or(record)
    } else {
        state.records.insert(id, record.clone());
        record
    };
    let mut echoed = stored;
    state.drift.apply(&mut echoed);
    Reply::json(200, echoed)
}

/// Handles `GET /pet/findByStatus?status=`.
fn find_by_status(state: &StoreState, query: &str) -> Reply {
    let wanted: Vec<&str> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == "status")
        .map(|(_, value)| value)
        .collect();
    let matches = state
        .records
        .values()
        .filter(|record| {
            record
                .get("status")
                .and_then(Value::as_str)
                .is_some_and(|status| wanted.contains(&status))
        })
        .map(|record| {
            let mut record = record.clone();
            state.drift.apply(&mut record);
            record
        })
        .collect();
    Reply::json(200, Value::Array(matches))
}

/// Handles `DELETE /pet/{id}`.
fn delete(state: &mut StoreState, id: i64, api_key: Option<&str>) -> Reply {
    if api_key != Some(state.api_key.as_str()) {
        return Reply::error(401, "unauthorized");
    }
    if let Some(status) = state.drift.delete_status {
        return Reply::error(status, "delete failed");
    }
    if state.records.remove(&id).is_some() {
        Reply::json(200, json!({"code": 200, "type": "unknown", "message": id.to_string()}))
    } else {
        Reply::empty(404)
    }
}

/// Returns a header value by case-insensitive name.
fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str().to_string())
}

/// Converts a routed reply into an HTTP response.
fn into_response(reply: Reply) -> Response<std::io::Cursor<Vec<u8>>> {
    match reply.body {
        None => Response::from_data(Vec::new()).with_status_code(reply.status),
        Some(body) => {
            let bytes = serde_json::to_vec(&body).unwrap_or_default();
            let response = Response::from_data(bytes).with_status_code(reply.status);
            match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
                Ok(header) => response.with_header(header),
                Err(()) => response,
            }
        }
    }
}
