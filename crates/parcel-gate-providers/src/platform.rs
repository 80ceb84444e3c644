// crates/parcel-gate-providers/src/platform.rs
// ============================================================================
// Module: Checkout Platform Validator
// Description: Confirms webhook request tokens with the checkout platform.
// Purpose: Reject forged webhooks before any payload is decoded.
// Dependencies: parcel-gate-core, reqwest, tracing, crate::http
// ============================================================================

//! ## Overview
//! The checkout platform signs each webhook with a one-time request token.
//! [`PlatformValidator`] asks the platform whether the token is genuine with
//! `GET <validate_url><token>` using basic auth. Any non-success answer
//! rejects the webhook.
//! Security posture: tokens are appended to a URL, so only URL-safe token
//! characters are accepted and tokens never appear in errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use parcel_gate_core::ProviderError;
use parcel_gate_core::RequestValidator;
use parcel_gate_core::ValidationError;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::http::Auth;
use crate::http::HttpSettings;
use crate::http::build_http_client;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest request token accepted.
const MAX_TOKEN_LEN: usize = 512;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Request validator backed by the checkout platform's validation endpoint.
#[derive(Debug, Clone)]
pub struct PlatformValidator {
    /// HTTP client.
    client: Client,
    /// Validation URL prefix; the token is appended.
    validate_url: String,
    /// Platform credential.
    auth: Auth,
}

impl PlatformValidator {
    /// Creates a validator.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(
        validate_url: &str,
        api_key: &str,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(settings)?,
            validate_url: validate_url.to_string(),
            auth: Auth::BasicKey(api_key.to_string()),
        })
    }
}

impl RequestValidator for PlatformValidator {
    fn validate(&self, token: &str) -> Result<(), ValidationError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ValidationError::MissingToken);
        }
        if !is_url_safe(token) {
            return Err(ValidationError::Rejected("token is malformed".to_string()));
        }
        let response = self
            .client
            .get(format!("{}{token}", self.validate_url))
            .header(AUTHORIZATION, self.auth.header_value())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|err| {
                let reason = if err.is_timeout() { "timed out" } else { "request failed" };
                ValidationError::Transport(reason.to_string())
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::Rejected(format!("platform answered {}", status.as_u16())));
        }
        debug!("request token validated");
        Ok(())
    }
}

/// Returns true when the token starts alphanumeric and only holds URL-safe characters.
fn is_url_safe(token: &str) -> bool {
    token.len() <= MAX_TOKEN_LEN
        && token.as_bytes().first().is_some_and(u8::is_ascii_alphanumeric)
        && token
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.'))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
