// crates/parcel-gate-core/src/orchestrator.rs
// ============================================================================
// Module: Shipment Orchestrator
// Description: Create-or-reuse shipment flow with customs and rate retrieval.
// Purpose: Drive a rate provider from an order to formatted shipping rates.
// Dependencies: thiserror, tracing, crate::{customs, interfaces, rates}
// ============================================================================

//! ## Overview
//! The orchestrator walks a small state machine per request:
//!
//! ```text
//! NEW -> CUSTOMS_PENDING (international) -> SHIPMENT_REQUESTED
//!     -> AWAITING_RATES -> RATES_READY -> DONE
//! NEW -> SHIPMENT_LOOKUP -> RATES_READY -> DONE   (prior rate id supplied)
//! ```
//!
//! A prior composite rate id names a shipment created by an earlier request;
//! it is fetched and never recreated. Any provider failure aborts the request.
//! Objects already created on the provider side are left in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::customs::CustomsAssembler;
use crate::interfaces::ProviderError;
use crate::interfaces::RateProvider;
use crate::order::Order;
use crate::rates::RateError;
use crate::rates::RateFormatter;
use crate::rates::RateId;
use crate::rates::ShippingRate;
use crate::shipment::Parcel;
use crate::shipment::ParcelTemplate;
use crate::shipment::Shipment;
use crate::shipment::ShipmentAddress;
use crate::shipment::ShipmentCustoms;
use crate::shipment::ShipmentRequest;
use crate::shipment::ShipmentStatus;
use crate::units::DimensionUnit;
use crate::units::WeightUnit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default wait budget for provider rate computation.
const DEFAULT_AWAIT_BUDGET: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Orchestrator lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentStage {
    /// Request received.
    New,
    /// Customs items and declaration are being created.
    CustomsPending,
    /// Shipment creation was requested.
    ShipmentRequested,
    /// Waiting for the provider to finish computing rates.
    AwaitingRates,
    /// Rates are available.
    RatesReady,
    /// Rates were formatted.
    Done,
    /// An existing shipment is being fetched.
    ShipmentLookup,
}

impl ShipmentStage {
    /// Returns the stage label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::CustomsPending => "customs_pending",
            Self::ShipmentRequested => "shipment_requested",
            Self::AwaitingRates => "awaiting_rates",
            Self::RatesReady => "rates_ready",
            Self::Done => "done",
            Self::ShipmentLookup => "shipment_lookup",
        }
    }
}

impl fmt::Display for ShipmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipping pipeline errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// A provider call failed.
    #[error("error with {operation}: {source}")]
    Provider {
        /// Operation that failed, e.g. `creating customs item`.
        operation: &'static str,
        /// Underlying provider error.
        #[source]
        source: ProviderError,
    },
    /// Rates could not be formatted.
    #[error("error with formatting shipping rates: {0}")]
    InvalidRate(#[from] RateError),
    /// The prior composite rate id could not be parsed.
    #[error("invalid shipping rate id '{0}'")]
    InvalidRateId(String),
}

impl ShippingError {
    /// Returns a stable short label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Provider {
                source: ProviderError::Timeout { .. },
                ..
            } => "provider_timeout",
            Self::Provider { .. } => "provider",
            Self::InvalidRate(_) => "invalid_rate",
            Self::InvalidRateId(_) => "invalid_rate_id",
        }
    }
}

/// Shipping configuration passed to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingSettings {
    /// Sender address.
    pub sender: ShipmentAddress,
    /// Default parcel dimensions.
    pub parcel: ParcelTemplate,
    /// Unit for parcel weights.
    pub weight_unit: WeightUnit,
    /// Unit for parcel dimensions.
    pub dimension_unit: DimensionUnit,
    /// Maximum time to wait for rate computation.
    pub await_budget: Duration,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            sender: ShipmentAddress::default(),
            parcel: ParcelTemplate::default(),
            weight_unit: WeightUnit::Oz,
            dimension_unit: DimensionUnit::In,
            await_budget: DEFAULT_AWAIT_BUDGET,
        }
    }
}

/// Result of a rate quote.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    /// Shipment the rates belong to; `None` when nothing was shippable.
    pub shipment_id: Option<String>,
    /// Formatted rates, sorted by cost.
    pub rates: Vec<ShippingRate>,
    /// Stages visited, in order.
    pub stages: Vec<ShipmentStage>,
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Drives a [`RateProvider`] from an order to formatted rates.
#[derive(Clone)]
pub struct ShipmentOrchestrator {
    /// Rate provider.
    provider: Arc<dyn RateProvider>,
    /// Customs paperwork builder.
    customs: CustomsAssembler,
    /// Rate formatter.
    formatter: RateFormatter,
    /// Shipping configuration.
    settings: ShippingSettings,
}

impl ShipmentOrchestrator {
    /// Creates an orchestrator from explicit collaborators.
    #[must_use]
    pub fn new(
        provider: Arc<dyn RateProvider>,
        customs: CustomsAssembler,
        formatter: RateFormatter,
        settings: ShippingSettings,
    ) -> Self {
        Self {
            provider,
            customs,
            formatter,
            settings,
        }
    }

    /// Quotes shipping rates for an order.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError`] when a provider call fails, the wait budget
    /// elapses, a rate amount is malformed, or the prior rate id is invalid.
    pub fn quote(&self, order: &Order) -> Result<RateQuote, ShippingError> {
        let mut stages = vec![ShipmentStage::New];
        if order.shippable_items().next().is_none() {
            info!(order = %order.token, "order has no shippable items");
            stages.push(ShipmentStage::Done);
            return Ok(RateQuote {
                shipment_id: None,
                rates: Vec::new(),
                stages,
            });
        }

        let shipment = match order.prior_rate_id() {
            Some(prior) => self.lookup_shipment(prior, &mut stages)?,
            None => self.create_shipment(order, &mut stages)?,
        };

        stages.push(ShipmentStage::RatesReady);
        let rates = self.provider.get_rates(&shipment.id).map_err(|source| {
            ShippingError::Provider {
                operation: "getting rates",
                source,
            }
        })?;
        debug!(shipment = %shipment.id, count = rates.len(), "provider rates received");
        let rates = self.formatter.format(&shipment.id, &rates)?;
        stages.push(ShipmentStage::Done);
        info!(
            order = %order.token,
            shipment = %shipment.id,
            rates = rates.len(),
            provider = self.provider.name(),
            "shipping rates quoted"
        );
        Ok(RateQuote {
            shipment_id: Some(shipment.id),
            rates,
            stages,
        })
    }

    /// Fetches the shipment named by a prior composite rate id.
    fn lookup_shipment(
        &self,
        prior: &str,
        stages: &mut Vec<ShipmentStage>,
    ) -> Result<Shipment, ShippingError> {
        let rate_id =
            RateId::parse(prior).map_err(|_| ShippingError::InvalidRateId(prior.to_string()))?;
        stages.push(ShipmentStage::ShipmentLookup);
        debug!(shipment = %rate_id.shipment_id, "reusing existing shipment");
        let shipment = self.provider.get_shipment(&rate_id.shipment_id).map_err(|source| {
            ShippingError::Provider {
                operation: "fetching existing shipment",
                source,
            }
        })?;
        if shipment.status == ShipmentStatus::Failed {
            return Err(ShippingError::Provider {
                operation: "fetching existing shipment",
                source: ProviderError::ShipmentFailed {
                    shipment_id: shipment.id.clone(),
                    message: shipment.messages.join("; "),
                },
            });
        }
        Ok(shipment)
    }

    /// Creates customs paperwork (when needed) and a new shipment.
    fn create_shipment(
        &self,
        order: &Order,
        stages: &mut Vec<ShipmentStage>,
    ) -> Result<Shipment, ShippingError> {
        let customs = if self.customs.requires_customs(order) {
            stages.push(ShipmentStage::CustomsPending);
            Some(self.create_customs(order)?)
        } else {
            None
        };

        let request = ShipmentRequest {
            from: self.settings.sender.clone(),
            to: recipient_address(order),
            parcel: self.parcel_for(order),
            customs,
        };
        stages.push(ShipmentStage::ShipmentRequested);
        let shipment = self.provider.create_shipment(&request).map_err(|source| {
            ShippingError::Provider {
                operation: "creating shipment",
                source,
            }
        })?;
        if !shipment.messages.is_empty() {
            warn!(
                shipment = %shipment.id,
                messages = %shipment.messages.join("; "),
                "provider shipment messages"
            );
        }

        stages.push(ShipmentStage::AwaitingRates);
        self.provider.await_ready(&shipment.id, self.settings.await_budget).map_err(|source| {
            ShippingError::Provider {
                operation: "awaiting shipment status",
                source,
            }
        })
    }

    /// Creates customs items and the declaration referencing them.
    fn create_customs(&self, order: &Order) -> Result<ShipmentCustoms, ShippingError> {
        debug!(country = %order.destination_country(), "international destination");
        let mut item_ids = Vec::new();
        for item in self.customs.build_customs_items(order) {
            let id = self.provider.create_customs_item(&item).map_err(|source| {
                ShippingError::Provider {
                    operation: "creating customs item",
                    source,
                }
            })?;
            item_ids.push(id);
        }
        let declaration = self.customs.build_customs_declaration(order, item_ids);
        let declaration_id =
            self.provider.create_customs_declaration(&declaration).map_err(|source| {
                ShippingError::Provider {
                    operation: "creating customs declaration",
                    source,
                }
            })?;
        Ok(ShipmentCustoms {
            declaration_id,
            exporter_tax_id: declaration.exporter_tax_id,
        })
    }

    /// Builds the parcel for an order from the configured template.
    fn parcel_for(&self, order: &Order) -> Parcel {
        let grams = if order.total_weight > 0.0 {
            order.total_weight
        } else {
            order.shippable_items().map(|item| item.weight * f64::from(item.quantity)).sum()
        };
        Parcel::from_template(
            &self.settings.parcel,
            self.settings.weight_unit.from_grams(grams),
            self.settings.weight_unit,
            self.settings.dimension_unit,
        )
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps the order's ship-to address onto a provider address.
fn recipient_address(order: &Order) -> ShipmentAddress {
    let address = order.shipment_address();
    ShipmentAddress {
        name: address.recipient().to_string(),
        company: address.company.clone(),
        street1: address.address1.clone(),
        street2: address.address2.clone(),
        city: address.city.clone(),
        state: address.province.clone(),
        postal_code: address.postal_code.clone(),
        country: address.country.clone(),
        phone: address.phone.clone(),
        email: order.email.clone(),
    }
}
