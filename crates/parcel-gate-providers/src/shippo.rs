// crates/parcel-gate-providers/src/shippo.rs
// ============================================================================
// Module: Shippo Provider
// Description: Rate provider binding for the Shippo REST API.
// Purpose: Map core shipment and customs types onto Shippo's wire format.
// Dependencies: parcel-gate-core, serde, tracing, crate::{http, poll}
// ============================================================================

//! ## Overview
//! Shippo creates shipments asynchronously: `POST /shipments/` with
//! `async: true` answers `QUEUED`, and the shipment is polled until it reaches
//! `SUCCESS` or `ERROR`. Rates are listed from `/shipments/{id}/rates/`,
//! following `next` links on the API host for at most [`MAX_RATE_PAGES`] pages.
//! Numeric quantities travel as decimal strings, as Shippo expects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use parcel_gate_core::CarrierRate;
use parcel_gate_core::CustomsDeclaration;
use parcel_gate_core::CustomsItem;
use parcel_gate_core::ExportCode;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateProvider;
use parcel_gate_core::Shipment;
use parcel_gate_core::ShipmentAddress;
use parcel_gate_core::ShipmentRequest;
use parcel_gate_core::ShipmentStatus;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::http::ApiClient;
use crate::http::object_path;
use crate::poll::PollSettings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Most rate listing pages fetched for one shipment.
const MAX_RATE_PAGES: usize = 5;

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Shippo rate provider.
#[derive(Debug, Clone)]
pub struct ShippoProvider {
    /// Authenticated API client.
    client: ApiClient,
    /// Status poll settings.
    poll: PollSettings,
}

impl ShippoProvider {
    /// Creates a provider over an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient, poll: PollSettings) -> Self {
        Self {
            client,
            poll,
        }
    }
}

impl RateProvider for ShippoProvider {
    fn name(&self) -> &str {
        "shippo"
    }

    fn create_customs_item(&self, item: &CustomsItem) -> Result<String, ProviderError> {
        let body = WireCustomsItem {
            description: &item.description,
            quantity: item.quantity,
            net_weight: decimal(item.weight),
            mass_unit: item.weight_unit.as_str(),
            value_amount: format!("{:.2}", item.value),
            value_currency: &item.currency,
            origin_country: &item.origin_country,
            tariff_number: item.tariff_number.as_deref(),
            metadata: format!("order:{}", item.order_reference),
        };
        let created: WireObject = self.client.post("customs/items/", &body)?;
        Ok(created.object_id)
    }

    fn create_customs_declaration(
        &self,
        declaration: &CustomsDeclaration,
    ) -> Result<String, ProviderError> {
        let body = WireDeclaration {
            certify: declaration.certify,
            certify_signer: &declaration.certifier,
            items: &declaration.item_ids,
            non_delivery_option: declaration.non_delivery.as_str().to_ascii_uppercase(),
            contents_type: declaration.contents_type.as_str().to_ascii_uppercase(),
            restriction_type: declaration.restriction_type.to_ascii_uppercase(),
            incoterm: declaration.incoterm.as_str(),
            eel_pfc: eel_pfc(declaration.export_code),
            exporter_identification: WireExporterId {
                tax_id: WireTaxId {
                    number: &declaration.exporter_tax_id.number,
                    kind: declaration.exporter_tax_id.kind.as_str(),
                },
            },
            is_vat_collected: declaration.vat_collected,
        };
        let created: WireObject = self.client.post("customs/declarations/", &body)?;
        Ok(created.object_id)
    }

    fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ProviderError> {
        let parcel = &request.parcel;
        let body = WireShipmentRequest {
            address_from: WireAddress::from(&request.from),
            address_to: WireAddress::from(&request.to),
            parcels: vec![WireParcel {
                length: decimal(parcel.length),
                width: decimal(parcel.width),
                height: decimal(parcel.height),
                distance_unit: parcel.dimension_unit.as_str(),
                weight: decimal(parcel.weight),
                mass_unit: parcel.weight_unit.as_str(),
            }],
            customs_declaration: request
                .customs
                .as_ref()
                .map(|customs| customs.declaration_id.as_str()),
            is_async: true,
        };
        let created: WireShipment = self.client.post("shipments/", &body)?;
        debug!(
            shipment_id = %created.object_id,
            status = %created.status,
            "shippo shipment created"
        );
        created.into_shipment()
    }

    fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, ProviderError> {
        let fetched: WireShipment = self.client.get(&object_path("shipments", shipment_id, "")?)?;
        fetched.into_shipment()
    }

    fn await_ready(&self, shipment_id: &str, budget: Duration) -> Result<Shipment, ProviderError> {
        self.poll.wait_until_ready(shipment_id, budget, || self.get_shipment(shipment_id))
    }

    fn get_rates(&self, shipment_id: &str) -> Result<Vec<CarrierRate>, ProviderError> {
        let mut path = object_path("shipments", shipment_id, "/rates/")?;
        let mut rates = Vec::new();
        for _ in 0..MAX_RATE_PAGES {
            let page: WireRatePage = self.client.get(&path)?;
            rates.extend(page.results.into_iter().map(WireRate::into_rate));
            let Some(next) = page.next.filter(|next| !next.is_empty()) else {
                return Ok(rates);
            };
            // Only follow links on the configured host; the credential goes with them.
            let Some(relative) = self.client.relative_path(&next) else {
                warn!(shipment_id = %shipment_id, "shippo rate page link leaves api host");
                return Ok(rates);
            };
            path = relative.to_string();
        }
        warn!(
            shipment_id = %shipment_id,
            pages = MAX_RATE_PAGES,
            rates = rates.len(),
            "shippo rate listing truncated"
        );
        Ok(rates)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats a number the way Shippo's decimal-string fields expect.
fn decimal(value: f64) -> String {
    format!("{value}")
}

/// Maps an export code onto Shippo's `eel_pfc` enumeration.
const fn eel_pfc(code: ExportCode) -> &'static str {
    match code {
        ExportCode::Noeei3037a => "NOEEI_30_37_a",
        ExportCode::Noeei3036 => "NOEEI_30_36",
    }
}

/// Maps a Shippo shipment status onto the core status.
fn parse_status(status: &str) -> Result<ShipmentStatus, ProviderError> {
    match status {
        "QUEUED" | "WAITING" => Ok(ShipmentStatus::Queued),
        "SUCCESS" => Ok(ShipmentStatus::Ready),
        "ERROR" => Ok(ShipmentStatus::Failed),
        other => Err(ProviderError::InvalidResponse(format!("unknown shipment status {other}"))),
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Customs item request.
#[derive(Serialize)]
struct WireCustomsItem<'a> {
    /// Item description.
    description: &'a str,
    /// Units shipped.
    quantity: u32,
    /// Weight as a decimal string.
    net_weight: String,
    /// Weight unit.
    mass_unit: &'static str,
    /// Declared value as a decimal string.
    value_amount: String,
    /// Value currency.
    value_currency: &'a str,
    /// Country of manufacture.
    origin_country: &'a str,
    /// HS tariff number.
    #[serde(skip_serializing_if = "Option::is_none")]
    tariff_number: Option<&'a str>,
    /// Free-form reference.
    metadata: String,
}

/// Customs declaration request.
#[derive(Serialize)]
struct WireDeclaration<'a> {
    /// Signer certifies the declaration.
    certify: bool,
    /// Signer name.
    certify_signer: &'a str,
    /// Customs item ids.
    items: &'a [String],
    /// `RETURN` or `ABANDON`.
    non_delivery_option: String,
    /// Contents category.
    contents_type: String,
    /// Restriction category.
    restriction_type: String,
    /// Trade term.
    incoterm: &'static str,
    /// Export filing exemption.
    eel_pfc: &'static str,
    /// Exporter tax identification.
    exporter_identification: WireExporterId<'a>,
    /// VAT already collected at checkout.
    is_vat_collected: bool,
}

/// Exporter identification block.
#[derive(Serialize)]
struct WireExporterId<'a> {
    /// Tax id.
    tax_id: WireTaxId<'a>,
}

/// Tax id block.
#[derive(Serialize)]
struct WireTaxId<'a> {
    /// Identifier value.
    number: &'a str,
    /// `EIN` or `IOSS`.
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Address block.
#[derive(Serialize)]
struct WireAddress<'a> {
    /// Recipient or sender name.
    name: &'a str,
    /// Company.
    company: &'a str,
    /// Street line 1.
    street1: &'a str,
    /// Street line 2.
    street2: &'a str,
    /// City.
    city: &'a str,
    /// State or province.
    state: &'a str,
    /// Postal code.
    zip: &'a str,
    /// ISO country code.
    country: &'a str,
    /// Phone.
    phone: &'a str,
    /// Email.
    email: &'a str,
}

impl<'a> From<&'a ShipmentAddress> for WireAddress<'a> {
    fn from(address: &'a ShipmentAddress) -> Self {
        Self {
            name: &address.name,
            company: &address.company,
            street1: &address.street1,
            street2: &address.street2,
            city: &address.city,
            state: &address.state,
            zip: &address.postal_code,
            country: &address.country,
            phone: &address.phone,
            email: &address.email,
        }
    }
}

/// Parcel block.
#[derive(Serialize)]
struct WireParcel {
    /// Length.
    length: String,
    /// Width.
    width: String,
    /// Height.
    height: String,
    /// Dimension unit.
    distance_unit: &'static str,
    /// Weight.
    weight: String,
    /// Weight unit.
    mass_unit: &'static str,
}

/// Shipment request.
#[derive(Serialize)]
struct WireShipmentRequest<'a> {
    /// Sender.
    address_from: WireAddress<'a>,
    /// Recipient.
    address_to: WireAddress<'a>,
    /// Parcels.
    parcels: Vec<WireParcel>,
    /// Customs declaration id for international shipments.
    #[serde(skip_serializing_if = "Option::is_none")]
    customs_declaration: Option<&'a str>,
    /// Compute rates asynchronously.
    #[serde(rename = "async")]
    is_async: bool,
}

/// Any created object.
#[derive(Deserialize)]
struct WireObject {
    /// Object id.
    object_id: String,
}

/// Shipment response.
#[derive(Deserialize)]
struct WireShipment {
    /// Shipment id.
    object_id: String,
    /// Shipment status.
    status: String,
    /// Carrier and validation messages.
    #[serde(default)]
    messages: Vec<WireMessage>,
}

impl WireShipment {
    /// Converts into the core shipment.
    fn into_shipment(self) -> Result<Shipment, ProviderError> {
        Ok(Shipment {
            status: parse_status(&self.status)?,
            id: self.object_id,
            messages: self.messages.into_iter().map(WireMessage::into_text).collect(),
        })
    }
}

/// Shipment message.
#[derive(Deserialize)]
struct WireMessage {
    /// Message origin.
    #[serde(default)]
    source: Option<String>,
    /// Message text.
    #[serde(default)]
    text: String,
}

impl WireMessage {
    /// Renders the message with its source.
    fn into_text(self) -> String {
        match self.source {
            Some(source) if !source.is_empty() => format!("{source}: {}", self.text),
            _ => self.text,
        }
    }
}

/// Rate listing page.
#[derive(Deserialize)]
struct WireRatePage {
    /// Rates on this page.
    #[serde(default)]
    results: Vec<WireRate>,
    /// Absolute URL of the next page, if any.
    #[serde(default)]
    next: Option<String>,
}

/// Carrier rate.
#[derive(Deserialize)]
struct WireRate {
    /// Rate id.
    object_id: String,
    /// Carrier name.
    provider: String,
    /// Service level.
    servicelevel: WireServiceLevel,
    /// Price as a decimal string.
    amount: String,
    /// Price currency.
    currency: String,
    /// Estimated transit days.
    #[serde(default)]
    estimated_days: Option<u32>,
}

impl WireRate {
    /// Converts into the core rate.
    fn into_rate(self) -> CarrierRate {
        CarrierRate {
            id: self.object_id,
            carrier: self.provider,
            service: self.servicelevel.name,
            service_token: self.servicelevel.token,
            amount: self.amount,
            currency: self.currency,
            estimated_days: self.estimated_days,
            guaranteed: false,
        }
    }
}

/// Service level block.
#[derive(Deserialize)]
struct WireServiceLevel {
    /// Display name.
    name: String,
    /// Stable token.
    #[serde(default)]
    token: Option<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use parcel_gate_core::ShipmentStatus;

    use super::parse_status;

    #[test]
    fn statuses_map_onto_core_states() {
        assert!(matches!(parse_status("QUEUED"), Ok(ShipmentStatus::Queued)));
        assert!(matches!(parse_status("WAITING"), Ok(ShipmentStatus::Queued)));
        assert!(matches!(parse_status("SUCCESS"), Ok(ShipmentStatus::Ready)));
        assert!(matches!(parse_status("ERROR"), Ok(ShipmentStatus::Failed)));
        assert!(parse_status("PAUSED").is_err());
    }
}
