// crates/parcel-gate-server/src/audit.rs
// ============================================================================
// Module: Webhook Audit Logging
// Description: Structured audit events for webhook request handling.
// Purpose: Emit one redacted JSON line per webhook without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every webhook produces exactly one [`WebhookAuditEvent`]. Events carry
//! sizes, timings, and classifications only: request tokens, API keys, and
//! order contents are never recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Coarse request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// Handled and answered with a 2xx status.
    Success,
    /// Refused before decoding.
    Rejected,
    /// Failed while decoding or processing.
    Error,
}

/// Webhook audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Webhook event name when the envelope decoded.
    pub event_name: Option<String>,
    /// HTTP status answered.
    pub status: u16,
    /// Request outcome.
    pub outcome: WebhookOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Handling latency in milliseconds.
    pub latency_ms: u64,
}

/// Inputs required to construct an audit event.
pub struct WebhookAuditEventParams {
    /// Webhook event name when the envelope decoded.
    pub event_name: Option<String>,
    /// HTTP status answered.
    pub status: u16,
    /// Request outcome.
    pub outcome: WebhookOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Handling latency in milliseconds.
    pub latency_ms: u64,
}

impl WebhookAuditEvent {
    /// Creates an audit event stamped with the current time.
    #[must_use]
    pub fn new(params: WebhookAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "webhook_request",
            timestamp_ms,
            event_name: params.event_name,
            status: params.status,
            outcome: params.outcome,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            latency_ms: params.latency_ms,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for webhook events.
pub trait AuditSink: Send + Sync {
    /// Records a webhook audit event.
    fn record(&self, event: &WebhookAuditEvent);
}

/// Audit sink writing JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &WebhookAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that drops events.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &WebhookAuditEvent) {}
}
