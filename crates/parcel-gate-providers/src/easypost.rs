// crates/parcel-gate-providers/src/easypost.rs
// ============================================================================
// Module: EasyPost Provider
// Description: Rate provider binding for the EasyPost v2 REST API.
// Purpose: Map core shipment and customs types onto EasyPost's wire format.
// Dependencies: parcel-gate-core, serde, tracing, crate::{http, poll}
// ============================================================================

//! ## Overview
//! EasyPost rates a shipment while creating it and embeds the rates in the
//! shipment object, so readiness means "carries rates or carrier messages".
//! EasyPost measures weight in ounces and dimensions in inches; configured
//! units are converted on the way out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use parcel_gate_core::CarrierRate;
use parcel_gate_core::CustomsDeclaration;
use parcel_gate_core::CustomsItem;
use parcel_gate_core::Parcel;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateProvider;
use parcel_gate_core::Shipment;
use parcel_gate_core::ShipmentAddress;
use parcel_gate_core::ShipmentRequest;
use parcel_gate_core::ShipmentStatus;
use parcel_gate_core::TaxIdKind;
use parcel_gate_core::WeightUnit;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::http::ApiClient;
use crate::http::object_path;
use crate::poll::PollSettings;

// ============================================================================
// SECTION: Provider
// ============================================================================

/// EasyPost rate provider.
#[derive(Debug, Clone)]
pub struct EasyPostProvider {
    /// Authenticated API client.
    client: ApiClient,
    /// Status poll settings.
    poll: PollSettings,
}

impl EasyPostProvider {
    /// Creates a provider over an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient, poll: PollSettings) -> Self {
        Self {
            client,
            poll,
        }
    }

    /// Fetches the raw shipment object.
    fn fetch(&self, shipment_id: &str) -> Result<WireShipment, ProviderError> {
        self.client.get(&object_path("shipments", shipment_id, "")?)
    }
}

impl RateProvider for EasyPostProvider {
    fn name(&self) -> &str {
        "easypost"
    }

    fn create_customs_item(&self, item: &CustomsItem) -> Result<String, ProviderError> {
        let body = CustomsItemEnvelope {
            customs_item: WireCustomsItem {
                description: &item.description,
                quantity: item.quantity,
                weight: ounces(item.weight_unit, item.weight),
                value: item.value,
                currency: &item.currency,
                origin_country: &item.origin_country,
                hs_tariff_number: item.tariff_number.as_deref(),
                code: &item.order_reference,
            },
        };
        let created: WireObject = self.client.post("customs_items", &body)?;
        Ok(created.id)
    }

    fn create_customs_declaration(
        &self,
        declaration: &CustomsDeclaration,
    ) -> Result<String, ProviderError> {
        let body = CustomsInfoEnvelope {
            customs_info: WireCustomsInfo {
                customs_certify: declaration.certify,
                customs_signer: &declaration.certifier,
                contents_type: declaration.contents_type.as_str(),
                restriction_type: &declaration.restriction_type,
                eel_pfc: declaration.export_code.as_str(),
                non_delivery_option: declaration.non_delivery.as_str(),
                customs_items: declaration
                    .item_ids
                    .iter()
                    .map(|id| WireReference {
                        id,
                    })
                    .collect(),
            },
        };
        let created: WireObject = self.client.post("customs_infos", &body)?;
        Ok(created.id)
    }

    fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ProviderError> {
        let tax_identifiers = request
            .customs
            .iter()
            .filter(|customs| customs.exporter_tax_id.kind == TaxIdKind::Ioss)
            .map(|customs| WireTaxIdentifier {
                entity: "SENDER",
                tax_id: &customs.exporter_tax_id.number,
                tax_id_type: customs.exporter_tax_id.kind.as_str(),
                issuing_country: &customs.exporter_tax_id.issuing_country,
            })
            .collect();
        let body = ShipmentEnvelope {
            shipment: WireShipmentRequest {
                from_address: WireAddress::from(&request.from),
                to_address: WireAddress::from(&request.to),
                parcel: WireParcel::from(&request.parcel),
                customs_info: request.customs.as_ref().map(|customs| WireReference {
                    id: &customs.declaration_id,
                }),
                tax_identifiers,
            },
        };
        let created: WireShipment = self.client.post("shipments", &body)?;
        debug!(shipment_id = %created.id, rates = created.rates.len(), "easypost shipment created");
        Ok(created.into_shipment())
    }

    fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, ProviderError> {
        Ok(self.fetch(shipment_id)?.into_shipment())
    }

    fn await_ready(&self, shipment_id: &str, budget: Duration) -> Result<Shipment, ProviderError> {
        self.poll.wait_until_ready(shipment_id, budget, || self.get_shipment(shipment_id))
    }

    fn get_rates(&self, shipment_id: &str) -> Result<Vec<CarrierRate>, ProviderError> {
        Ok(self.fetch(shipment_id)?.rates.into_iter().map(WireRate::into_rate).collect())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a weight in `unit` to ounces.
fn ounces(unit: WeightUnit, value: f64) -> f64 {
    WeightUnit::Oz.from_grams(unit.to_grams(value))
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// `{"customs_item": ..}` request wrapper.
#[derive(Serialize)]
struct CustomsItemEnvelope<'a> {
    /// Item.
    customs_item: WireCustomsItem<'a>,
}

/// Customs item request.
#[derive(Serialize)]
struct WireCustomsItem<'a> {
    /// Item description.
    description: &'a str,
    /// Units shipped.
    quantity: u32,
    /// Weight in ounces.
    weight: f64,
    /// Declared value.
    value: f64,
    /// Value currency.
    currency: &'a str,
    /// Country of manufacture.
    origin_country: &'a str,
    /// HS tariff number.
    #[serde(skip_serializing_if = "Option::is_none")]
    hs_tariff_number: Option<&'a str>,
    /// Free-form reference.
    code: &'a str,
}

/// `{"customs_info": ..}` request wrapper.
#[derive(Serialize)]
struct CustomsInfoEnvelope<'a> {
    /// Declaration.
    customs_info: WireCustomsInfo<'a>,
}

/// Customs declaration request.
#[derive(Serialize)]
struct WireCustomsInfo<'a> {
    /// Signer certifies the declaration.
    customs_certify: bool,
    /// Signer name.
    customs_signer: &'a str,
    /// Contents category.
    contents_type: &'static str,
    /// Restriction category.
    restriction_type: &'a str,
    /// Export filing exemption.
    eel_pfc: &'static str,
    /// `return` or `abandon`.
    non_delivery_option: &'static str,
    /// Customs items by id.
    customs_items: Vec<WireReference<'a>>,
}

/// Reference to an existing object.
#[derive(Serialize)]
struct WireReference<'a> {
    /// Object id.
    id: &'a str,
}

/// `{"shipment": ..}` request wrapper.
#[derive(Serialize)]
struct ShipmentEnvelope<'a> {
    /// Shipment.
    shipment: WireShipmentRequest<'a>,
}

/// Shipment request.
#[derive(Serialize)]
struct WireShipmentRequest<'a> {
    /// Sender.
    from_address: WireAddress<'a>,
    /// Recipient.
    to_address: WireAddress<'a>,
    /// Parcel in inches and ounces.
    parcel: WireParcel,
    /// Customs declaration for international shipments.
    #[serde(skip_serializing_if = "Option::is_none")]
    customs_info: Option<WireReference<'a>>,
    /// IOSS identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tax_identifiers: Vec<WireTaxIdentifier<'a>>,
}

/// Tax identifier block.
#[derive(Serialize)]
struct WireTaxIdentifier<'a> {
    /// Party the identifier belongs to.
    entity: &'static str,
    /// Identifier value.
    tax_id: &'a str,
    /// Identifier scheme.
    tax_id_type: &'static str,
    /// Issuing country.
    issuing_country: &'a str,
}

/// Address block.
#[derive(Serialize)]
struct WireAddress<'a> {
    /// Name.
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

/// Parcel block in inches and ounces.
#[derive(Serialize)]
struct WireParcel {
    /// Length in inches.
    length: f64,
    /// Width in inches.
    width: f64,
    /// Height in inches.
    height: f64,
    /// Weight in ounces.
    weight: f64,
}

impl From<&Parcel> for WireParcel {
    fn from(parcel: &Parcel) -> Self {
        Self {
            length: parcel.dimension_unit.to_inches(parcel.length),
            width: parcel.dimension_unit.to_inches(parcel.width),
            height: parcel.dimension_unit.to_inches(parcel.height),
            weight: ounces(parcel.weight_unit, parcel.weight),
        }
    }
}

/// Any created object.
#[derive(Deserialize)]
struct WireObject {
    /// Object id.
    id: String,
}

/// Shipment response.
#[derive(Deserialize)]
struct WireShipment {
    /// Shipment id.
    id: String,
    /// Embedded rates.
    #[serde(default)]
    rates: Vec<WireRate>,
    /// Carrier messages.
    #[serde(default)]
    messages: Vec<WireMessage>,
}

impl WireShipment {
    /// Converts into the core shipment; rates or messages mean rating ended.
    fn into_shipment(self) -> Shipment {
        let status = if self.rates.is_empty() && self.messages.is_empty() {
            ShipmentStatus::Queued
        } else {
            ShipmentStatus::Ready
        };
        Shipment {
            id: self.id,
            status,
            messages: self.messages.into_iter().map(WireMessage::into_text).collect(),
        }
    }
}

/// Carrier message.
#[derive(Deserialize)]
struct WireMessage {
    /// Carrier name.
    #[serde(default)]
    carrier: Option<String>,
    /// Message text.
    #[serde(default)]
    message: String,
}

impl WireMessage {
    /// Renders the message with its carrier.
    fn into_text(self) -> String {
        match self.carrier {
            Some(carrier) if !carrier.is_empty() => format!("{carrier}: {}", self.message),
            _ => self.message,
        }
    }
}

/// Embedded carrier rate.
#[derive(Deserialize)]
struct WireRate {
    /// Rate id.
    id: String,
    /// Carrier code.
    carrier: String,
    /// Service code.
    service: String,
    /// Price as a decimal string.
    rate: String,
    /// Price currency.
    #[serde(default)]
    currency: String,
    /// Estimated transit days.
    #[serde(default)]
    est_delivery_days: Option<u32>,
    /// Carrier-quoted transit days.
    #[serde(default)]
    delivery_days: Option<u32>,
    /// Delivery date is guaranteed.
    #[serde(default)]
    delivery_date_guaranteed: Option<bool>,
}

impl WireRate {
    /// Converts into the core rate.
    fn into_rate(self) -> CarrierRate {
        CarrierRate {
            id: self.id,
            carrier: self.carrier,
            service: self.service,
            service_token: None,
            amount: self.rate,
            currency: self.currency,
            estimated_days: self.est_delivery_days.or(self.delivery_days),
            guaranteed: self.delivery_date_guaranteed.unwrap_or(false),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use parcel_gate_core::WeightUnit;

    use super::ounces;

    #[test]
    fn weights_convert_to_ounces() {
        assert!((ounces(WeightUnit::Lb, 1.0) - 16.0).abs() < 1e-9);
        assert!((ounces(WeightUnit::Oz, 10.0) - 10.0).abs() < 1e-9);
    }
}
