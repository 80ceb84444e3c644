// crates/parcel-gate-server/tests/webhook_router.rs
// ============================================================================
// Module: Webhook Router Tests
// Description: End-to-end webhook handling against in-memory collaborators.
// Purpose: Pin status codes, reply bodies, and audit records per event.
// ============================================================================

//! ## Overview
//! Drives [`parcel_gate_server::WebhookRouter`] with real envelopes and checks
//! the ordering guarantees: authentication before decode, decode before
//! dispatch, and exactly one audit event per request.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use parcel_gate_server::ReplyBody;
use parcel_gate_server::WebhookOutcome;
use parcel_gate_server::WebhookReply;
use serde_json::Value;
use serde_json::json;

use crate::common::GOOD_TOKEN;
use crate::common::MemoryAudit;
use crate::common::RouterOptions;
use crate::common::StubProvider;
use crate::common::envelope;
use crate::common::order;
use crate::common::router;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a JSON reply body.
fn json_body(reply: &WebhookReply) -> Value {
    match &reply.body {
        ReplyBody::Json(bytes) => serde_json::from_slice(bytes).unwrap(),
        other => panic!("expected json body, got {other:?}"),
    }
}

/// Returns a text reply body.
fn text_body(reply: &WebhookReply) -> &str {
    match &reply.body {
        ReplyBody::Text(text) => text,
        other => panic!("expected text body, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

#[test]
fn missing_token_is_rejected_before_decode() {
    let provider = Arc::new(StubProvider::new());
    let audit = Arc::new(MemoryAudit::default());
    let router = router(Arc::clone(&provider), Arc::clone(&audit), RouterOptions::default());

    let reply = router.handle(None, b"not json at all");

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(text_body(&reply), "missing request token");
    assert!(provider.calls().is_empty());
    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, WebhookOutcome::Rejected);
    assert_eq!(events[0].error_kind, Some("unauthenticated"));
    assert!(events[0].event_name.is_none());
}

#[test]
fn unknown_token_is_rejected() {
    let router = router(
        Arc::new(StubProvider::new()),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let body = envelope("taxes.calculate", &order("DE", "Jane Doe"));
    let reply = router.handle(Some("forged"), &body);

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

#[test]
fn malformed_envelope_is_a_server_error() {
    let audit = Arc::new(MemoryAudit::default());
    let router = router(
        Arc::new(StubProvider::new()),
        Arc::clone(&audit),
        RouterOptions::default(),
    );

    let reply = router.handle(Some(GOOD_TOKEN), b"{\"content\":{}}");

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text_body(&reply).starts_with("error with webhook envelope decode"));
    assert_eq!(audit.events()[0].error_kind, Some("decode"));
}

#[test]
fn unknown_event_is_acknowledged_with_empty_object() {
    let router = router(
        Arc::new(StubProvider::new()),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let reply = router.handle(Some(GOOD_TOKEN), &envelope("unknown.event", &json!(null)));

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(json_body(&reply), json!({}));
}

#[test]
fn oversized_body_is_refused() {
    let options = RouterOptions {
        max_body_bytes: 16,
        ..RouterOptions::default()
    };
    let router = router(Arc::new(StubProvider::new()), Arc::new(MemoryAudit::default()), options);

    let reply = router.handle(Some(GOOD_TOKEN), &envelope("unknown.event", &json!(null)));

    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// SECTION: Events
// ============================================================================

#[test]
fn shipping_rates_are_sorted_and_composite() {
    let provider = Arc::new(StubProvider::new());
    let audit = Arc::new(MemoryAudit::default());
    let router = router(Arc::clone(&provider), Arc::clone(&audit), RouterOptions::default());

    let body = envelope("shippingrates.fetch", &order("US", "Jane Doe"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert_eq!(reply.status, StatusCode::OK);
    let rates = json_body(&reply)["rates"].clone();
    assert_eq!(rates[0]["userDefinedId"], "SHIP-NEW;R2");
    assert_eq!(rates[0]["cost"], 7.5);
    assert_eq!(rates[0]["description"], "USPS Priority - Estimated arrival 2 days");
    assert_eq!(rates[1]["userDefinedId"], "SHIP-NEW;R1");
    assert_eq!(provider.calls(), vec!["create_shipment", "await_ready", "get_rates"]);
    let events = audit.events();
    assert_eq!(events[0].event_name.as_deref(), Some("shippingrates.fetch"));
    assert_eq!(events[0].outcome, WebhookOutcome::Success);
    assert_eq!(events[0].response_bytes, reply.body.len());
}

#[test]
fn provider_failure_is_a_server_error_with_message() {
    let audit = Arc::new(MemoryAudit::default());
    let router = router(
        Arc::new(StubProvider::failing()),
        Arc::clone(&audit),
        RouterOptions::default(),
    );

    let body = envelope("shippingrates.fetch", &order("US", "Jane Doe"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        text_body(&reply),
        "error with creating shipment: provider rejected request (400): address invalid"
    );
    assert_eq!(audit.events()[0].error_kind, Some("provider"));
    assert_eq!(audit.events()[0].outcome, WebhookOutcome::Error);
}

#[test]
fn recipient_name_check_answers_with_errors() {
    let provider = Arc::new(StubProvider::new());
    let options = RouterOptions {
        validate_recipient_name: true,
        ..RouterOptions::default()
    };
    let router = router(Arc::clone(&provider), Arc::new(MemoryAudit::default()), options);

    let body = envelope("shippingrates.fetch", &order("US", "Madonna"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(json_body(&reply)["errors"][0]["key"], "invalid_address_name");
    assert!(provider.calls().is_empty());
}

#[test]
fn recipient_name_check_is_off_by_default() {
    let provider = Arc::new(StubProvider::new());
    let router = router(
        Arc::clone(&provider),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let body = envelope("shippingrates.fetch", &order("US", "Madonna"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert!(json_body(&reply).get("rates").is_some());
}

#[test]
fn eu_taxes_apply_standard_vat() {
    let router = router(
        Arc::new(StubProvider::new()),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let body = envelope("taxes.calculate", &order("DE", "Jane Doe"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert_eq!(reply.status, StatusCode::OK);
    let taxes = json_body(&reply)["taxes"].clone();
    assert_eq!(taxes.as_array().unwrap().len(), 1);
    assert_eq!(taxes[0]["name"], "VAT (DE)");
    assert_eq!(taxes[0]["amount"], 19.0);
    assert_eq!(taxes[0]["numberForInvoice"], "VAT-DE-19%");
    assert_eq!(taxes[0]["rate"], 0.19);
}

#[test]
fn domestic_taxes_are_a_single_zero_line() {
    let router = router(
        Arc::new(StubProvider::new()),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let body = envelope("taxes.calculate", &order("US", "Jane Doe"));
    let taxes = json_body(&router.handle(Some(GOOD_TOKEN), &body))["taxes"].clone();

    assert_eq!(taxes.as_array().unwrap().len(), 1);
    assert_eq!(taxes[0]["amount"], 0.0);
    assert_eq!(taxes[0]["numberForInvoice"], "TAX-000");
}

#[test]
fn order_completed_is_acknowledged_without_body() {
    let provider = Arc::new(StubProvider::new());
    let router = router(
        Arc::clone(&provider),
        Arc::new(MemoryAudit::default()),
        RouterOptions::default(),
    );

    let body = envelope("order.completed", &order("US", "Jane Doe"));
    let reply = router.handle(Some(GOOD_TOKEN), &body);

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, ReplyBody::Empty);
    assert!(provider.calls().is_empty());
}
