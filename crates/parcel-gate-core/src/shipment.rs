// crates/parcel-gate-core/src/shipment.rs
// ============================================================================
// Module: Shipment Domain Types
// Description: Provider-neutral shipment, parcel, customs, and rate values.
// Purpose: Describe what the pipeline asks of a rate provider.
// Dependencies: serde, crate::units
// ============================================================================

//! ## Overview
//! These types are the vocabulary shared by the pipeline and every
//! [`crate::RateProvider`] binding. They intentionally carry no provider wire
//! details: each binding maps them onto its own request bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::units::DimensionUnit;
use crate::units::WeightUnit;

// ============================================================================
// SECTION: Addresses
// ============================================================================

/// Address block sent to the provider (sender or recipient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentAddress {
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// First street line.
    pub street1: String,
    /// Second street line.
    pub street2: String,
    /// City.
    pub city: String,
    /// State or province code.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO country code.
    pub country: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
}

// ============================================================================
// SECTION: Parcels
// ============================================================================

/// Default parcel dimensions from configuration.
///
/// # Invariants
/// - Dimensions are positive once configuration has been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelTemplate {
    /// Length in the configured dimension unit.
    pub length: f64,
    /// Width in the configured dimension unit.
    pub width: f64,
    /// Height in the configured dimension unit.
    pub height: f64,
}

impl Default for ParcelTemplate {
    fn default() -> Self {
        Self {
            length: 10.0,
            width: 8.0,
            height: 4.0,
        }
    }
}

/// Parcel sent with a shipment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parcel {
    /// Length.
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Dimension unit.
    pub dimension_unit: DimensionUnit,
    /// Weight.
    pub weight: f64,
    /// Weight unit.
    pub weight_unit: WeightUnit,
}

impl Parcel {
    /// Builds a parcel from the template, overriding weight and units.
    #[must_use]
    pub const fn from_template(
        template: &ParcelTemplate,
        weight: f64,
        weight_unit: WeightUnit,
        dimension_unit: DimensionUnit,
    ) -> Self {
        Self {
            length: template.length,
            width: template.width,
            height: template.height,
            dimension_unit,
            weight,
            weight_unit,
        }
    }
}

// ============================================================================
// SECTION: Customs
// ============================================================================

/// Customs declaration for a single line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomsItem {
    /// Goods description.
    pub description: String,
    /// Quantity shipped.
    pub quantity: u32,
    /// Net weight in `weight_unit`.
    pub weight: f64,
    /// Weight unit.
    pub weight_unit: WeightUnit,
    /// Declared value.
    pub value: f64,
    /// Upper-case ISO currency code.
    pub currency: String,
    /// ISO country of origin.
    pub origin_country: String,
    /// Harmonized-system tariff number when known.
    pub tariff_number: Option<String>,
    /// External order reference.
    pub order_reference: String,
}

/// What to do with an undeliverable international parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonDeliveryOption {
    /// Return to sender.
    #[default]
    Return,
    /// Abandon the parcel.
    Abandon,
}

impl NonDeliveryOption {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Return => "return",
            Self::Abandon => "abandon",
        }
    }
}

/// Customs contents classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentsType {
    /// Documents.
    Documents,
    /// Gift.
    Gift,
    /// Merchandise.
    #[default]
    Merchandise,
    /// Returned goods.
    ReturnedGoods,
    /// Sample.
    Sample,
    /// Other.
    Other,
}

impl ContentsType {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Gift => "gift",
            Self::Merchandise => "merchandise",
            Self::ReturnedGoods => "returned_goods",
            Self::Sample => "sample",
            Self::Other => "other",
        }
    }
}

/// International commercial term for duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Incoterm {
    /// Delivered duty unpaid.
    Ddu,
    /// Delivered duty paid.
    Ddp,
}

impl Incoterm {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ddu => "DDU",
            Self::Ddp => "DDP",
        }
    }
}

/// Export-control exemption code (EEL/PFC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportCode {
    /// `NOEEI 30.37(a)`: low-value exports.
    Noeei3037a,
    /// `NOEEI 30.36`: exports to Canada.
    Noeei3036,
}

impl ExportCode {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noeei3037a => "NOEEI 30.37(a)",
            Self::Noeei3036 => "NOEEI 30.36",
        }
    }
}

impl fmt::Display for ExportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exporter tax identifier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxIdKind {
    /// US employer identification number.
    Ein,
    /// EU import one-stop-shop number.
    Ioss,
}

impl TaxIdKind {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ein => "EIN",
            Self::Ioss => "IOSS",
        }
    }
}

/// Exporter tax identifier attached to customs paperwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxIdentifier {
    /// Identifier type.
    pub kind: TaxIdKind,
    /// Identifier value.
    pub number: String,
    /// ISO country that issued the identifier.
    pub issuing_country: String,
}

/// Aggregate customs declaration for an international shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomsDeclaration {
    /// Provider ids of the declared customs items.
    pub item_ids: Vec<String>,
    /// Whether the certifier attests to the declaration.
    pub certify: bool,
    /// Name of the certifying person.
    pub certifier: String,
    /// Non-delivery policy.
    pub non_delivery: NonDeliveryOption,
    /// Contents classification.
    pub contents_type: ContentsType,
    /// Restriction classification.
    pub restriction_type: String,
    /// Duty terms.
    pub incoterm: Incoterm,
    /// Export-control exemption code.
    pub export_code: ExportCode,
    /// Exporter tax identifier.
    pub exporter_tax_id: TaxIdentifier,
    /// True when VAT was collected at the point of sale.
    pub vat_collected: bool,
}

/// Customs data attached to a shipment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentCustoms {
    /// Provider id of the created declaration.
    pub declaration_id: String,
    /// Exporter tax identifier used on the declaration.
    pub exporter_tax_id: TaxIdentifier,
}

// ============================================================================
// SECTION: Shipments
// ============================================================================

/// Request to create a shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRequest {
    /// Sender address.
    pub from: ShipmentAddress,
    /// Recipient address.
    pub to: ShipmentAddress,
    /// Parcel to ship.
    pub parcel: Parcel,
    /// Customs data for international shipments.
    pub customs: Option<ShipmentCustoms>,
}

/// Provider-side shipment processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShipmentStatus {
    /// Rates are still being computed.
    Queued,
    /// Rates are available.
    Ready,
    /// Rate computation failed.
    Failed,
}

/// Provider-side shipment handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shipment {
    /// Provider shipment id.
    pub id: String,
    /// Processing status at the time of the call.
    pub status: ShipmentStatus,
    /// Provider messages (carrier warnings, validation notes).
    pub messages: Vec<String>,
}

// ============================================================================
// SECTION: Rates
// ============================================================================

/// Raw carrier rate as returned by a provider.
///
/// # Invariants
/// - `amount` is kept as the provider's decimal string; parsing happens in
///   [`crate::RateFormatter`] so malformed values fail the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierRate {
    /// Provider rate id.
    pub id: String,
    /// Carrier account code (e.g. `UPSDAP`, `USPS`).
    pub carrier: String,
    /// Service name or machine-cased service code.
    pub service: String,
    /// Service-level token when the provider exposes one.
    pub service_token: Option<String>,
    /// Decimal amount string.
    pub amount: String,
    /// ISO currency of the amount.
    pub currency: String,
    /// Estimated transit days.
    pub estimated_days: Option<u32>,
    /// Whether the delivery estimate is guaranteed.
    pub guaranteed: bool,
}

impl CarrierRate {
    /// Returns the service level used for allow-list matching.
    #[must_use]
    pub fn service_level(&self) -> &str {
        self.service_token.as_deref().unwrap_or(&self.service)
    }
}
