// crates/contract-gate-client/src/http.rs
// ============================================================================
// Module: HTTP Contract Client
// Description: Blocking HTTP transport for the pet resource API.
// Purpose: Map logical operations onto bounded, non-retrying HTTP calls.
// Dependencies: contract-gate-core, reqwest, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`HttpContractClient`] implements [`ContractTransport`] over
//! `reqwest::blocking`. Every answered call becomes a [`ContractResponse`]
//! whatever its status; only calls that produced no usable answer become
//! [`TransportError`] values. Redirects are not followed, bodies are read
//! under a hard byte limit, and nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use contract_gate_core::AuthToken;
use contract_gate_core::ContractResponse;
use contract_gate_core::ContractTransport;
use contract_gate_core::ResourceRecord;
use contract_gate_core::ResourceStatus;
use contract_gate_core::ResponseBody;
use contract_gate_core::TransportError;
use contract_gate_core::interfaces::operation;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";
/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default response body limit in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Header carrying the delete token.
pub const API_KEY_HEADER: &str = "api_key";
/// Path segment of the resource collection.
const RESOURCE_SEGMENT: &str = "pet";
/// Path segment of the status listing.
const FIND_BY_STATUS_SEGMENT: &str = "findByStatus";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP client.
///
/// # Invariants
/// - `base_url` is an absolute `http` or `https` URL.
/// - `timeout_ms` bounds each call from send to last body byte.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpClientConfig {
    /// Service base URL; operation paths are appended to it.
    pub base_url: String,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: format!("contract-gate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors raised while constructing a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The base URL is unusable.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// The timeout is zero.
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    /// The underlying HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking HTTP transport for the resource API.
#[derive(Debug, Clone)]
pub struct HttpContractClient {
    /// Shared connection pool.
    client: Client,
    /// Parsed base URL.
    base: Url,
    /// Per-call timeout.
    timeout: Duration,
    /// Response body limit.
    max_response_bytes: usize,
}

impl HttpContractClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL or timeout is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &HttpClientConfig) -> Result<Self, ClientError> {
        let base = parse_base_url(&config.base_url)?;
        if config.timeout_ms == 0 {
            return Err(ClientError::InvalidTimeout);
        }
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            client,
            base,
            timeout,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns a client sharing this connection pool with a different
    /// per-call timeout.
    #[must_use]
    pub fn with_call_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends `segments` to the base URL path.
    fn endpoint(&self, name: &'static str, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Request {
                operation: name,
                message: "base url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Serializes `record` as a JSON request body.
    fn json_body(name: &'static str, record: &ResourceRecord) -> Result<Vec<u8>, TransportError> {
        serde_json::to_vec(record).map_err(|err| TransportError::Request {
            operation: name,
            message: err.to_string(),
        })
    }

    /// Sends `request` and normalizes the answer.
    fn send(
        &self,
        name: &'static str,
        request: RequestBuilder,
    ) -> Result<ContractResponse, TransportError> {
        let mut response = request
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .map_err(|err| classify_error(name, &err))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = read_response_limited(name, &mut response, self.max_response_bytes)?;
        let body = classify_body(name, content_type.as_deref(), &bytes)?;
        Ok(ContractResponse {
            status,
            body,
        })
    }
}

impl ContractTransport for HttpContractClient {
    fn get_by_id(&self, id: i64) -> Result<ContractResponse, TransportError> {
        let name = operation::GET_BY_ID;
        let url = self.endpoint(name, &[RESOURCE_SEGMENT, &id.to_string()])?;
        self.send(name, self.client.get(url))
    }

    fn create(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        let name = operation::CREATE;
        let url = self.endpoint(name, &[RESOURCE_SEGMENT])?;
        let body = Self::json_body(name, record)?;
        self.send(name, self.client.post(url).header(CONTENT_TYPE, "application/json").body(body))
    }

    fn update(&self, record: &ResourceRecord) -> Result<ContractResponse, TransportError> {
        let name = operation::UPDATE;
        let url = self.endpoint(name, &[RESOURCE_SEGMENT])?;
        let body = Self::json_body(name, record)?;
        self.send(name, self.client.put(url).header(CONTENT_TYPE, "application/json").body(body))
    }

    fn find_by_status(&self, status: ResourceStatus) -> Result<ContractResponse, TransportError> {
        let name = operation::FIND_BY_STATUS;
        let mut url = self.endpoint(name, &[RESOURCE_SEGMENT, FIND_BY_STATUS_SEGMENT])?;
        url.query_pairs_mut().append_pair("status", status.as_str());
        self.send(name, self.client.get(url))
    }

    fn delete_by_id(
        &self,
        id: i64,
        token: &AuthToken,
    ) -> Result<ContractResponse, TransportError> {
        let name = operation::DELETE_BY_ID;
        let url = self.endpoint(name, &[RESOURCE_SEGMENT, &id.to_string()])?;
        self.send(name, self.client.delete(url).header(API_KEY_HEADER, token.expose()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and checks the configured base URL.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ClientError::InvalidBaseUrl("base url must name a host".to_string()));
    }
    Ok(url)
}

/// Maps a send failure onto the transport taxonomy.
fn classify_error(name: &'static str, err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            operation: name,
        }
    } else if err.is_connect() {
        TransportError::Connect {
            operation: name,
            message: err.to_string(),
        }
    } else if err.is_builder() {
        TransportError::Request {
            operation: name,
            message: err.to_string(),
        }
    } else {
        // The peer answered, but not with a usable HTTP response.
        TransportError::Malformed {
            operation: name,
            message: err.to_string(),
        }
    }
}

/// Returns true when a body read failed because the call timeout elapsed.
///
/// The blocking body reader wraps its `reqwest::Error` in an `io::Error`.
fn is_read_timeout(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::TimedOut
        || err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    name: &'static str,
    response: &mut reqwest::blocking::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let malformed = |message: &str| TransportError::Malformed {
        operation: name,
        message: message.to_string(),
    };
    let expected_len = response.content_length();
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| malformed("response size limit exceeds u64"))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(malformed("response exceeds size limit"));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    if let Err(err) = handle.read_to_end(&mut buf) {
        if is_read_timeout(&err) {
            return Err(TransportError::Timeout {
                operation: name,
            });
        }
        return Err(malformed(&format!("failed to read response: {err}")));
    }
    if buf.len() > max_bytes {
        return Err(malformed("response exceeds size limit"));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected).map_err(|_| malformed("invalid response length"))?;
        if buf.len() < expected {
            return Err(malformed("response truncated"));
        }
    }
    Ok(buf)
}

/// Returns true for `application/json` and `+json` media types.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Normalizes a response body according to its declared content type.
fn classify_body(
    name: &'static str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ResponseBody, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseBody::Empty);
    }
    match content_type {
        Some(declared) if is_json_media_type(declared) => serde_json::from_slice::<Value>(bytes)
            .map(ResponseBody::Json)
            .map_err(|err| TransportError::Malformed {
                operation: name,
                message: format!("invalid json body: {err}"),
            }),
        Some(_) => Ok(ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned())),
        None => Ok(serde_json::from_slice::<Value>(bytes).map_or_else(
            |_| ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
            ResponseBody::Json,
        )),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
