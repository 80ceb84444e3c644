// crates/parcel-gate-core/src/interfaces.rs
// ============================================================================
// Module: Parcel Gate Interfaces
// Description: Provider-agnostic seams for rate providers and webhook checks.
// Purpose: Keep provider and platform I/O out of the pipeline.
// Dependencies: thiserror, crate::shipment
// ============================================================================

//! ## Overview
//! The pipeline talks to the outside world through two traits: a
//! [`RateProvider`] that creates shipments and returns carrier rates, and a
//! [`RequestValidator`] that confirms a webhook really came from the checkout
//! platform. Implementations live in `parcel-gate-providers`; tests use
//! in-memory doubles.
//!
//! Security posture: implementations handle untrusted provider responses and
//! must fail closed on anything they cannot parse.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::shipment::CarrierRate;
use crate::shipment::CustomsDeclaration;
use crate::shipment::CustomsItem;
use crate::shipment::Shipment;
use crate::shipment::ShipmentRequest;

// ============================================================================
// SECTION: Rate Provider
// ============================================================================

/// Rate provider errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never include credentials.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be sent or the response could not be read.
    #[error("provider transport error: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Provider error message.
        message: String,
    },
    /// The provider answered with a body that could not be decoded.
    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),
    /// An object id cannot be placed in a provider URL.
    #[error("invalid provider object id: {0}")]
    InvalidObjectId(String),
    /// The provider reported that rate computation failed.
    #[error("shipment {shipment_id} failed: {message}")]
    ShipmentFailed {
        /// Provider shipment id.
        shipment_id: String,
        /// Provider messages joined for display.
        message: String,
    },
    /// Rates were not ready within the wait budget.
    #[error("shipment {shipment_id} not ready after {elapsed_ms} ms")]
    Timeout {
        /// Provider shipment id.
        shipment_id: String,
        /// Time spent waiting, in milliseconds.
        elapsed_ms: u64,
    },
}

/// Shipping-rate provider capability.
///
/// Calls block the current thread; callers on an async runtime must move
/// them onto a blocking pool.
pub trait RateProvider: Send + Sync {
    /// Returns the provider name used in logs.
    fn name(&self) -> &str;

    /// Creates a customs item and returns its provider id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider rejects the item.
    fn create_customs_item(&self, item: &CustomsItem) -> Result<String, ProviderError>;

    /// Creates a customs declaration and returns its provider id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider rejects the declaration.
    fn create_customs_declaration(
        &self,
        declaration: &CustomsDeclaration,
    ) -> Result<String, ProviderError>;

    /// Creates a shipment; rate computation may continue asynchronously.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider rejects the shipment.
    fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ProviderError>;

    /// Fetches an existing shipment by provider id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the shipment cannot be fetched.
    fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, ProviderError>;

    /// Polls until the shipment's rates are ready, bounded by `budget`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Timeout`] when the budget elapses and
    /// [`ProviderError::ShipmentFailed`] when the provider reports failure.
    fn await_ready(&self, shipment_id: &str, budget: Duration) -> Result<Shipment, ProviderError>;

    /// Lists the carrier rates computed for a shipment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when rates cannot be fetched or decoded.
    fn get_rates(&self, shipment_id: &str) -> Result<Vec<CarrierRate>, ProviderError>;
}

// ============================================================================
// SECTION: Request Validator
// ============================================================================

/// Webhook authenticity errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No request token accompanied the webhook.
    #[error("missing request token")]
    MissingToken,
    /// The platform did not recognize the token.
    #[error("request token rejected: {0}")]
    Rejected(String),
    /// The platform could not be reached.
    #[error("request token validation failed: {0}")]
    Transport(String),
}

/// Confirms that a webhook originated from the checkout platform.
pub trait RequestValidator: Send + Sync {
    /// Validates the request token sent with a webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the token is missing, unknown, or
    /// cannot be checked.
    fn validate(&self, token: &str) -> Result<(), ValidationError>;
}
