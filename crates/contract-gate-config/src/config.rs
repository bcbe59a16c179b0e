// crates/contract-gate-config/src/config.rs
// ============================================================================
// Module: Contract Gate Configuration
// Description: Configuration loading and validation for Contract Gate.
// Purpose: Provide strict config parsing with hard limits and env overrides.
// Dependencies: contract-gate-core, contract-gate-client, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then environment overrides are applied, then the result is validated. When
//! no path was requested and the default file is absent, built-in defaults
//! are used so the harness runs against the public service out of the box.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use contract_gate_client::DEFAULT_BASE_URL;
use contract_gate_client::DEFAULT_TIMEOUT_MS;
use contract_gate_client::HttpClientConfig;
use contract_gate_core::AuthToken;
use contract_gate_core::EventSink;
use contract_gate_core::FileEventSink;
use contract_gate_core::NoopEventSink;
use contract_gate_core::ResourceKind;
use contract_gate_core::SchemaContract;
use contract_gate_core::SchemaRegistry;
use contract_gate_core::StderrEventSink;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "contract-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTRACT_GATE_CONFIG";
/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV_VAR: &str = "CONTRACT_GATE_BASE_URL";
/// Environment variable overriding `timeout_ms`.
pub const TIMEOUT_ENV_VAR: &str = "CONTRACT_GATE_TIMEOUT_MS";
/// Environment variable overriding `api_key`.
pub const API_KEY_ENV_VAR: &str = "CONTRACT_GATE_API_KEY";
/// Default delete token accepted by the public pet store.
pub const DEFAULT_API_KEY: &str = "special-key";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum contract document size in bytes.
pub(crate) const MAX_CONTRACT_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound on the per-call timeout.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;
/// Maximum api key length in bytes.
pub(crate) const MAX_API_KEY_LENGTH: usize = 256;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root harness configuration.
///
/// # Invariants
/// - After [`HarnessConfig::validate`] succeeds, `base_url` is an `http` or
///   `https` URL without credentials and `timeout_ms` is within bounds.
/// - Contract kinds are unique.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Service base URL.
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,
    /// Per-call timeout in milliseconds.
    #[serde(default = "default_timeout_ms", alias = "timeoutMs")]
    pub timeout_ms: u64,
    /// Token presented on delete calls.
    #[serde(default = "default_api_key", alias = "apiKey")]
    pub api_key: String,
    /// Event logging configuration.
    #[serde(default)]
    pub events: EventsConfig,
    /// Contract documents that add or replace registered contracts.
    #[serde(default)]
    pub contracts: Vec<ContractSource>,
    /// File the configuration was read from (not deserialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            api_key: default_api_key(),
            events: EventsConfig::default(),
            contracts: Vec::new(),
            source: None,
        }
    }
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key", &"<redacted>")
            .field("events", &self.events)
            .field("contracts", &self.contracts)
            .field("source", &self.source)
            .finish()
    }
}

/// Where harness events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `events.path`.
    File,
    /// Events are discarded.
    None,
}

impl EventSinkKind {
    /// Parses a sink name as accepted on the command line.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stderr" => Some(Self::Stderr),
            "file" => Some(Self::File),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Event logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl EventsConfig {
    /// Validates sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("events.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("events.path", &path.to_string_lossy()),
            (_, None) => Ok(()),
        }
    }
}

/// A JSON Schema document registered under a resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSource {
    /// Resource kind the contract describes.
    pub kind: String,
    /// Path to the JSON Schema document.
    pub path: PathBuf,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration from disk using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| env::var_os(name))
    }

    /// Loads configuration resolving environment variables through `lookup`.
    ///
    /// Resolution order is `path`, then `CONTRACT_GATE_CONFIG`, then
    /// `./contract-gate.toml`. Only the last may be missing, in which case
    /// defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load_with_env(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, &lookup)?;
        let mut config = match resolved {
            Resolved::Explicit(path) => Self::from_file(&path)?,
            Resolved::Default(path) if path.exists() => Self::from_file(&path)?,
            Resolved::Default(_) => Self::default(),
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses one config file without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, too large, not
    /// UTF-8, or not valid TOML for this model.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let content = read_limited_utf8(path, MAX_CONFIG_FILE_SIZE, "config file")?;
        let mut config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies `CONTRACT_GATE_*` overrides resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override is empty, not UTF-8,
    /// or (for the timeout) not an integer.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = env_value(&lookup, BASE_URL_ENV_VAR)? {
            self.base_url = value;
        }
        if let Some(value) = env_value(&lookup, TIMEOUT_ENV_VAR)? {
            self.timeout_ms = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV_VAR} must be an integer"))
            })?;
        }
        if let Some(value) = env_value(&lookup, API_KEY_ENV_VAR)? {
            self.api_key = value;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.base_url)?;
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key must be non-empty".to_string()));
        }
        if self.api_key.len() > MAX_API_KEY_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "api_key exceeds {MAX_API_KEY_LENGTH} bytes"
            )));
        }
        self.events.validate()?;
        let mut seen = BTreeSet::new();
        for source in &self.contracts {
            let kind = source.kind.trim();
            if kind.is_empty() {
                return Err(ConfigError::Invalid("contracts.kind must be non-empty".to_string()));
            }
            if kind != source.kind {
                return Err(ConfigError::Invalid("contracts.kind must be trimmed".to_string()));
            }
            if !seen.insert(kind) {
                return Err(ConfigError::Invalid(format!("duplicate contracts.kind: {kind}")));
            }
            validate_path_string("contracts.path", &source.path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Runtime Construction
// ============================================================================

impl HarnessConfig {
    /// Returns HTTP client settings for this configuration.
    #[must_use]
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            ..HttpClientConfig::default()
        }
    }

    /// Returns the delete token.
    #[must_use]
    pub fn auth_token(&self) -> AuthToken {
        AuthToken::new(self.api_key.clone())
    }

    /// Builds the schema registry: built-in contracts plus configured ones.
    ///
    /// Relative contract paths resolve against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a contract document cannot be read or is
    /// not a supported JSON Schema.
    pub fn build_registry(&self) -> Result<SchemaRegistry, ConfigError> {
        let mut registry = SchemaRegistry::with_builtin_contracts();
        for source in &self.contracts {
            let path = self.resolve_relative(&source.path);
            validate_path(&path)?;
            let content = read_limited_utf8(&path, MAX_CONTRACT_FILE_SIZE, "contract file")?;
            let document: Value = serde_json::from_str(&content).map_err(|err| {
                ConfigError::Parse(format!("contract {}: {err}", source.kind))
            })?;
            let contract = SchemaContract::from_json_schema(source.kind.clone(), &document)
                .map_err(|err| ConfigError::Invalid(format!("contract {}: {err}", source.kind)))?;
            registry.register(ResourceKind::new(source.kind.clone()), contract);
        }
        Ok(registry)
    }

    /// Builds the configured event sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the event log cannot be opened.
    pub fn build_event_sink(&self) -> Result<Box<dyn EventSink>, ConfigError> {
        match (self.events.sink, &self.events.path) {
            (EventSinkKind::Stderr, _) => Ok(Box::new(StderrEventSink)),
            (EventSinkKind::None, _) => Ok(Box::new(NoopEventSink)),
            (EventSinkKind::File, Some(path)) => {
                let path = self.resolve_relative(path);
                let sink = FileEventSink::new(&path).map_err(|err| {
                    ConfigError::Io(format!("events.path {}: {err}", path.display()))
                })?;
                Ok(Box::new(sink))
            }
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("events.path is required for the file sink".to_string()))
            }
        }
    }

    /// Resolves `path` against the config file directory when relative.
    fn resolve_relative(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.source
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or JSON parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path and whether it was requested explicitly.
enum Resolved {
    /// Named by the caller or the environment; must exist.
    Explicit(PathBuf),
    /// The default filename; may be absent.
    Default(PathBuf),
}

/// Default for `base_url`.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default for `timeout_ms`.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default for `api_key`.
fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(
    path: Option<&Path>,
    lookup: &impl Fn(&str) -> Option<OsString>,
) -> Result<Resolved, ConfigError> {
    if let Some(path) = path {
        return Ok(Resolved::Explicit(path.to_path_buf()));
    }
    if let Some(env_path) = env_value(lookup, CONFIG_ENV_VAR)? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Resolved::Explicit(PathBuf::from(env_path)));
    }
    Ok(Resolved::Default(PathBuf::from(DEFAULT_CONFIG_NAME)))
}

/// Reads an environment override; unset is `None`, empty or non-UTF-8 fails.
fn env_value(
    lookup: &impl Fn(&str) -> Option<OsString>,
    name: &str,
) -> Result<Option<String>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value =
        raw.into_string().map_err(|_| ConfigError::Invalid(format!("{name} must be utf-8")))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must be non-empty")));
    }
    Ok(Some(value))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path-valued key against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Reads a file under a size limit and requires UTF-8.
fn read_limited_utf8(path: &Path, limit: usize, label: &str) -> Result<String, ConfigError> {
    let bytes = fs::read(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > limit {
        return Err(ConfigError::Invalid(format!("{label} exceeds size limit")));
    }
    String::from_utf8(bytes).map_err(|_| ConfigError::Invalid(format!("{label} must be utf-8")))
}

/// Validates the service base URL.
fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("base_url is not a valid url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("base_url must use http or https".to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("base_url must include a host".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid("base_url must not embed credentials".to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
