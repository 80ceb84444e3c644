// crates/parcel-gate-server/src/router.rs
// ============================================================================
// Module: Webhook Router
// Description: Authenticates, decodes, and dispatches checkout webhooks.
// Purpose: Map each webhook onto one reply without touching the transport.
// Dependencies: axum (status codes), parcel-gate-core, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`WebhookRouter::handle`] is synchronous and blocking: provider calls run
//! inline, so async callers must move it onto a blocking pool. The order of
//! checks is fixed: token first (`400`), then envelope decode (`500`), then
//! event dispatch. Unknown events are acknowledged with `200 {}`.
//! Invariants:
//! - Nothing is decoded before the request token is confirmed.
//! - Every call records exactly one audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use parcel_gate_core::Order;
use parcel_gate_core::RequestValidator;
use parcel_gate_core::ShipmentOrchestrator;
use parcel_gate_core::ShippingRatesResponse;
use parcel_gate_core::TaxAssessor;
use parcel_gate_core::TaxResponse;
use parcel_gate_core::ValidationError;
use parcel_gate_core::WebhookEnvelope;
use parcel_gate_core::WebhookEvent;
use parcel_gate_core::validate_recipient_name;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::audit::AuditSink;
use crate::audit::WebhookAuditEvent;
use crate::audit::WebhookAuditEventParams;
use crate::audit::WebhookOutcome;

// ============================================================================
// SECTION: Replies
// ============================================================================

/// Reply body kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// `application/json` document.
    Json(Vec<u8>),
    /// `text/plain` message.
    Text(String),
    /// No body.
    Empty,
}

impl ReplyBody {
    /// Returns the body size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Json(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
            Self::Empty => 0,
        }
    }

    /// Returns true when the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reply to a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    /// HTTP status.
    pub status: StatusCode,
    /// Body.
    pub body: ReplyBody,
}

impl WebhookReply {
    /// Builds a `200` JSON reply.
    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::ok(ReplyBody::Json(bytes)),
            Err(err) => Self::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("error with response encode: {err}"),
            ),
        }
    }

    /// Builds a `200` reply with the given body.
    const fn ok(body: ReplyBody) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// Builds a text reply.
    const fn text(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ReplyBody::Text(message),
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Request-independent handler for checkout webhooks.
pub struct WebhookRouter {
    /// Request authenticity check.
    validator: Arc<dyn RequestValidator>,
    /// Rate pipeline.
    orchestrator: ShipmentOrchestrator,
    /// Tax computation.
    tax: TaxAssessor,
    /// Check recipient names before quoting.
    validate_recipient_name: bool,
    /// Maximum accepted body size in bytes.
    max_body_bytes: usize,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
}

/// Inputs required to construct a [`WebhookRouter`].
pub struct WebhookRouterParts {
    /// Request authenticity check.
    pub validator: Arc<dyn RequestValidator>,
    /// Rate pipeline.
    pub orchestrator: ShipmentOrchestrator,
    /// Tax computation.
    pub tax: TaxAssessor,
    /// Check recipient names before quoting.
    pub validate_recipient_name: bool,
    /// Maximum accepted body size in bytes.
    pub max_body_bytes: usize,
    /// Audit sink.
    pub audit: Arc<dyn AuditSink>,
}

/// Outcome of dispatch before auditing.
struct Handled {
    /// Reply sent to the platform.
    reply: WebhookReply,
    /// Event name when decoded.
    event_name: Option<String>,
    /// Error kind label when failed.
    error_kind: Option<&'static str>,
}

impl WebhookRouter {
    /// Creates a router from its parts.
    #[must_use]
    pub fn new(parts: WebhookRouterParts) -> Self {
        Self {
            validator: parts.validator,
            orchestrator: parts.orchestrator,
            tax: parts.tax,
            validate_recipient_name: parts.validate_recipient_name,
            max_body_bytes: parts.max_body_bytes,
            audit: parts.audit,
        }
    }

    /// Handles one webhook request and records its audit event.
    #[must_use]
    pub fn handle(&self, token: Option<&str>, body: &[u8]) -> WebhookReply {
        let started = Instant::now();
        let handled = self.dispatch(token, body);
        let status = handled.reply.status;
        let outcome = if status.is_success() {
            WebhookOutcome::Success
        } else if status.is_client_error() {
            WebhookOutcome::Rejected
        } else {
            WebhookOutcome::Error
        };
        self.audit.record(&WebhookAuditEvent::new(WebhookAuditEventParams {
            event_name: handled.event_name,
            status: status.as_u16(),
            outcome,
            error_kind: handled.error_kind,
            request_bytes: body.len(),
            response_bytes: handled.reply.body.len(),
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }));
        handled.reply
    }

    /// Runs the ordered checks and dispatches the event.
    fn dispatch(&self, token: Option<&str>, body: &[u8]) -> Handled {
        if body.len() > self.max_body_bytes {
            let message = "request body too large".to_string();
            return failure(StatusCode::PAYLOAD_TOO_LARGE, message, None, "body_too_large");
        }
        let token_check = token
            .map_or(Err(ValidationError::MissingToken), |token| self.validator.validate(token));
        if let Err(err) = token_check {
            warn!(error = %err, "webhook token rejected");
            let kind = match err {
                ValidationError::Transport(_) => "validator_unavailable",
                ValidationError::MissingToken | ValidationError::Rejected(_) => "unauthenticated",
            };
            return failure(StatusCode::BAD_REQUEST, err.to_string(), None, kind);
        }
        let envelope = match WebhookEnvelope::decode(body) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "webhook decode failed");
                return failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None, "decode");
            }
        };
        let event_name = envelope.event.name().to_string();
        match envelope.event {
            WebhookEvent::ShippingRatesFetch(order) => self.shipping_rates(&order, event_name),
            WebhookEvent::TaxesCalculate(order) => {
                let taxes = self.tax.assess_order(&order);
                let reply = WebhookReply::json(&TaxResponse {
                    taxes,
                });
                success(reply, event_name)
            }
            WebhookEvent::OrderCompleted(order) => {
                info!(invoice = %order.invoice_number, "order completed");
                success(WebhookReply::ok(ReplyBody::Empty), event_name)
            }
            WebhookEvent::Unknown(name) => {
                info!(event_name = %name, "ignoring unhandled webhook event");
                success(WebhookReply::ok(ReplyBody::Json(b"{}".to_vec())), event_name)
            }
        }
    }

    /// Answers a rate-fetch event.
    fn shipping_rates(&self, order: &Order, event_name: String) -> Handled {
        if self.validate_recipient_name
            && let Some(errors) = validate_recipient_name(order.shipment_address())
        {
            info!(invoice = %order.invoice_number, "recipient name refused");
            return success(WebhookReply::json(&errors), event_name);
        }
        match self.orchestrator.quote(order) {
            Ok(quote) => success(
                WebhookReply::json(&ShippingRatesResponse {
                    rates: quote.rates,
                }),
                event_name,
            ),
            Err(err) => {
                warn!(invoice = %order.invoice_number, error = %err, "rate quote failed");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                failure(status, err.to_string(), Some(event_name), err.kind())
            }
        }
    }
}

/// Wraps a successful reply.
const fn success(reply: WebhookReply, event_name: String) -> Handled {
    Handled {
        reply,
        event_name: Some(event_name),
        error_kind: None,
    }
}

/// Builds a failed text reply.
const fn failure(
    status: StatusCode,
    message: String,
    event_name: Option<String>,
    error_kind: &'static str,
) -> Handled {
    Handled {
        reply: WebhookReply::text(status, message),
        event_name,
        error_kind: Some(error_kind),
    }
}
