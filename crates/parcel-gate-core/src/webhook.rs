// crates/parcel-gate-core/src/webhook.rs
// ============================================================================
// Module: Webhook Envelope
// Description: Discriminated decode of checkout webhook documents.
// Purpose: Classify events before decoding their typed payloads.
// Dependencies: serde, serde_json, thiserror, time, crate::{order, rates, tax}
// ============================================================================

//! ## Overview
//! Checkout webhooks share the envelope `{eventName, createdOn, content}`.
//! The discriminator is read first while `content` stays raw JSON; the
//! payload is decoded only once the event is known, so unknown events are
//! acknowledged without ever touching their content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::order::Order;
use crate::rates::ShippingRate;
use crate::tax::TaxLine;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Event name of the rate-fetch webhook.
pub const EVENT_SHIPPING_RATES_FETCH: &str = "shippingrates.fetch";
/// Event name of the tax-calculation webhook.
pub const EVENT_TAXES_CALCULATE: &str = "taxes.calculate";
/// Event name of the order-completed webhook.
pub const EVENT_ORDER_COMPLETED: &str = "order.completed";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Webhook decode errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The body is not a webhook envelope.
    #[error("error with webhook envelope decode: {0}")]
    Malformed(String),
    /// The payload of a known event could not be decoded.
    #[error("error with {event} event decode: {message}")]
    InvalidContent {
        /// Event name.
        event: String,
        /// Decoder message.
        message: String,
    },
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Envelope as read from the wire, with the payload left undecoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    /// Event discriminator.
    event_name: String,
    /// Event timestamp, RFC 3339.
    #[serde(default)]
    created_on: Option<String>,
    /// Undecoded payload.
    #[serde(default)]
    content: Option<Box<RawValue>>,
}

/// Classified webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// Shipping rates requested for an order.
    ShippingRatesFetch(Order),
    /// Taxes requested for an order.
    TaxesCalculate(Order),
    /// Order was completed.
    OrderCompleted(Order),
    /// Any other event, acknowledged without processing.
    Unknown(String),
}

impl WebhookEvent {
    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ShippingRatesFetch(_) => EVENT_SHIPPING_RATES_FETCH,
            Self::TaxesCalculate(_) => EVENT_TAXES_CALCULATE,
            Self::OrderCompleted(_) => EVENT_ORDER_COMPLETED,
            Self::Unknown(name) => name,
        }
    }
}

/// Decoded webhook envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEnvelope {
    /// Event timestamp when present and well-formed.
    pub created_on: Option<OffsetDateTime>,
    /// Classified event.
    pub event: WebhookEvent,
}

impl WebhookEnvelope {
    /// Decodes a webhook body: discriminator first, payload second.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] when the body is not an envelope
    /// and [`EnvelopeError::InvalidContent`] when a known event's payload
    /// does not decode as an order.
    pub fn decode(body: &[u8]) -> Result<Self, EnvelopeError> {
        let raw: RawEnvelope = serde_json::from_slice(body)
            .map_err(|err| EnvelopeError::Malformed(err.to_string()))?;
        let created_on = raw
            .created_on
            .as_deref()
            .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok());
        let event = match raw.event_name.as_str() {
            EVENT_SHIPPING_RATES_FETCH => {
                WebhookEvent::ShippingRatesFetch(decode_order(&raw.event_name, raw.content)?)
            }
            EVENT_TAXES_CALCULATE => {
                WebhookEvent::TaxesCalculate(decode_order(&raw.event_name, raw.content)?)
            }
            EVENT_ORDER_COMPLETED => {
                WebhookEvent::OrderCompleted(decode_order(&raw.event_name, raw.content)?)
            }
            _ => WebhookEvent::Unknown(raw.event_name),
        };
        Ok(Self {
            created_on,
            event,
        })
    }
}

/// Decodes the order payload of a known event.
fn decode_order(event: &str, content: Option<Box<RawValue>>) -> Result<Order, EnvelopeError> {
    let invalid = |message: String| EnvelopeError::InvalidContent {
        event: event.to_string(),
        message,
    };
    let content = content.ok_or_else(|| invalid("missing content".to_string()))?;
    serde_json::from_str(content.get()).map_err(|err| invalid(err.to_string()))
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response body for `shippingrates.fetch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRatesResponse {
    /// Offered rates, sorted by cost.
    pub rates: Vec<ShippingRate>,
}

/// Response body for `taxes.calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResponse {
    /// Tax lines.
    pub taxes: Vec<TaxLine>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
