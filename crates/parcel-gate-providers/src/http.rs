// crates/parcel-gate-providers/src/http.rs
// ============================================================================
// Module: Provider HTTP Client
// Description: Blocking JSON client shared by provider bindings.
// Purpose: Centralize auth, timeouts, redirect policy, and size limits.
// Dependencies: reqwest, serde, serde_json, base64
// ============================================================================

//! ## Overview
//! [`ApiClient`] wraps a blocking `reqwest` client bound to one API base URL
//! and credential. Requests carry JSON bodies, responses are read with a hard
//! byte limit, and non-success statuses become
//! [`ProviderError::Rejected`] with the provider's own message extracted.
//! Invariants:
//! - Redirects are never followed.
//! - Error messages never include credentials or request URLs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use parcel_gate_core::ProviderError;
use parcel_gate_core::is_object_id;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum provider response size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum characters of a provider error message kept for display.
const MAX_ERROR_MESSAGE_CHARS: usize = 512;
/// JSON media type.
const APPLICATION_JSON: &str = "application/json";

// ============================================================================
// SECTION: Settings
// ============================================================================

/// HTTP client settings.
///
/// # Invariants
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: "parcel-gate/0.1".to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// Credential scheme for an API.
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: ShippoToken <key>`.
    ShippoToken(String),
    /// HTTP basic auth with the key as user and an empty password.
    BasicKey(String),
}

impl Auth {
    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::ShippoToken(key) => format!("ShippoToken {key}"),
            Self::BasicKey(key) => format!("Basic {}", STANDARD.encode(format!("{key}:"))),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShippoToken(_) => f.write_str("ShippoToken(<redacted>)"),
            Self::BasicKey(_) => f.write_str("BasicKey(<redacted>)"),
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// JSON API client bound to a base URL and credential.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying blocking client.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Credential.
    auth: Auth,
    /// Maximum response body size in bytes.
    max_response_bytes: usize,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, auth: Auth, settings: &HttpSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(settings)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            max_response_bytes: settings.max_response_bytes,
        })
    }

    /// Returns the full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the API path of an absolute URL on this client's base URL.
    ///
    /// Returns `None` for URLs on any other origin.
    #[must_use]
    pub fn relative_path<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.base_url.as_str())
            .filter(|rest| rest.starts_with('/') && !rest.starts_with("//"))
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        self.send(self.client.get(self.url(path)))
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ProviderError::InvalidResponse(format!("request encode: {err}")))?;
        self.send(
            self.client.post(self.url(path)).header(CONTENT_TYPE, APPLICATION_JSON).body(payload),
        )
    }

    /// Sends a prepared request and decodes the response.
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let mut response = request
            .header(AUTHORIZATION, self.auth.header_value())
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        let body = read_response_limited(&mut response, self.max_response_bytes)?;
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_slice(&body).map_err(|err| ProviderError::InvalidResponse(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds `<collection>/<id><suffix>` after checking `id` is a single segment.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidObjectId`] when `id` holds characters
/// outside a plain provider object id.
pub fn object_path(collection: &str, id: &str, suffix: &str) -> Result<String, ProviderError> {
    if !is_object_id(id) {
        return Err(ProviderError::InvalidObjectId(id.chars().take(64).collect()));
    }
    Ok(format!("{collection}/{id}{suffix}"))
}

/// Builds a blocking HTTP client that never follows redirects.
///
/// # Errors
///
/// Returns [`ProviderError::Transport`] when the client cannot be built.
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .user_agent(settings.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|_| ProviderError::Transport("http client build failed".to_string()))
}

/// Maps a `reqwest` error without leaking the request URL.
#[must_use]
pub fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::Transport("request timed out".to_string());
    }
    ProviderError::Transport(err.without_url().to_string())
}

/// Reads the response body while enforcing a byte limit.
///
/// # Errors
///
/// Returns [`ProviderError::Transport`] when the body is too large, cannot be
/// read, or is shorter than its declared length.
pub fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, ProviderError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ProviderError::Transport("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(ProviderError::Transport("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|_| ProviderError::Transport("failed to read response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(ProviderError::Transport("response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| ProviderError::Transport("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(ProviderError::Transport("response truncated".to_string()));
        }
    }
    Ok(buf)
}

/// Extracts a display message from a provider error body.
///
/// Understands `{"error":{"message":..}}`, `{"detail":..}`, and
/// `{"message":..}`; anything else is shown verbatim, truncated.
#[must_use]
pub fn error_message(body: &[u8]) -> String {
    let text = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .pointer("/error/message")
            .or_else(|| value.get("detail"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), ToString::to_string),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    };
    if text.is_empty() {
        return "empty response".to_string();
    }
    text.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
