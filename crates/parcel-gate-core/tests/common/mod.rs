// crates/parcel-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared order fixtures and a recording rate provider.
// Purpose: Keep integration tests focused on pipeline behavior.
// ============================================================================

//! Shared helpers for `parcel-gate-core` integration tests.

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers may panic on poisoned locks."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use parcel_gate_core::Address;
use parcel_gate_core::AllowList;
use parcel_gate_core::CarrierRate;
use parcel_gate_core::CountryClassifier;
use parcel_gate_core::CustomField;
use parcel_gate_core::CustomsAssembler;
use parcel_gate_core::CustomsDeclaration;
use parcel_gate_core::CustomsItem;
use parcel_gate_core::CustomsSettings;
use parcel_gate_core::LineItem;
use parcel_gate_core::Order;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateFormatter;
use parcel_gate_core::RateProvider;
use parcel_gate_core::Shipment;
use parcel_gate_core::ShipmentAddress;
use parcel_gate_core::ShipmentOrchestrator;
use parcel_gate_core::ShipmentRequest;
use parcel_gate_core::ShipmentStatus;
use parcel_gate_core::ShippingSettings;

/// Builds an order shipping two items to `country`.
pub fn sample_order(country: &str) -> Order {
    Order {
        token: "order-token".to_string(),
        invoice_number: "SNIP-1001".to_string(),
        currency: "usd".to_string(),
        email: "jane@example.com".to_string(),
        shipping_address: Address {
            full_name: "Jane Doe".to_string(),
            address1: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            province: "NH".to_string(),
            postal_code: "03101".to_string(),
            country: country.to_string(),
            ..Address::default()
        },
        items: vec![
            LineItem {
                id: "SKU-1".to_string(),
                name: "Pedal".to_string(),
                quantity: 2,
                price: 25.0,
                total_price: 50.0,
                weight: 283.5,
                custom_fields: vec![CustomField {
                    name: "hs_code".to_string(),
                    value: "8543.70".to_string(),
                }],
                ..LineItem::default()
            },
            LineItem {
                id: "SKU-2".to_string(),
                name: "Manual PDF".to_string(),
                quantity: 1,
                price: 5.0,
                total_price: 5.0,
                weight: 0.0,
                shippable: false,
                ..LineItem::default()
            },
        ],
        total_weight: 567.0,
        items_total: 55.0,
        ..Order::default()
    }
}

/// Customs settings with recognizable identifiers.
pub fn customs_settings() -> CustomsSettings {
    CustomsSettings {
        certifier: "Sam Sender".to_string(),
        ein: "12-3456789".to_string(),
        ioss: "IM7240000001".to_string(),
        ..CustomsSettings::default()
    }
}

/// Builds a carrier rate.
pub fn rate(id: &str, carrier: &str, service: &str, amount: &str) -> CarrierRate {
    CarrierRate {
        id: id.to_string(),
        carrier: carrier.to_string(),
        service: service.to_string(),
        service_token: None,
        amount: amount.to_string(),
        currency: "USD".to_string(),
        estimated_days: Some(3),
        guaranteed: false,
    }
}

/// In-memory provider that records every call.
pub struct RecordingProvider {
    /// Calls in order, as `name` or `name:argument`.
    pub calls: Mutex<Vec<String>>,
    /// Shipment requests received.
    pub requests: Mutex<Vec<ShipmentRequest>>,
    /// Declarations received.
    pub declarations: Mutex<Vec<CustomsDeclaration>>,
    /// Rates returned for every shipment.
    pub rates: Vec<CarrierRate>,
    /// Call name that fails with a rejection.
    pub fail_on: Option<&'static str>,
}

impl RecordingProvider {
    /// Creates a provider returning `rates` for every shipment.
    pub fn new(rates: Vec<CarrierRate>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            declarations: Mutex::new(Vec::new()),
            rates,
            fail_on: None,
        }
    }

    /// Makes the named call fail with a rejection.
    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_on = Some(call);
        self
    }

    /// Returns a snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Records a call and fails it when configured.
    fn record(&self, call: &'static str, argument: &str) -> Result<(), ProviderError> {
        let entry =
            if argument.is_empty() { call.to_string() } else { format!("{call}:{argument}") };
        self.calls.lock().unwrap().push(entry);
        if self.fail_on == Some(call) {
            return Err(ProviderError::Rejected {
                status: 400,
                message: format!("{call} refused"),
            });
        }
        Ok(())
    }
}

impl RateProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    fn create_customs_item(&self, item: &CustomsItem) -> Result<String, ProviderError> {
        self.record("create_customs_item", &item.description)?;
        Ok(format!("ITEM-{}", item.description))
    }

    fn create_customs_declaration(
        &self,
        declaration: &CustomsDeclaration,
    ) -> Result<String, ProviderError> {
        self.record("create_customs_declaration", "")?;
        self.declarations.lock().unwrap().push(declaration.clone());
        Ok("DECL-1".to_string())
    }

    fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment, ProviderError> {
        self.record("create_shipment", "")?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(Shipment {
            id: "SHIP-NEW".to_string(),
            status: ShipmentStatus::Queued,
            messages: Vec::new(),
        })
    }

    fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, ProviderError> {
        self.record("get_shipment", shipment_id)?;
        Ok(Shipment {
            id: shipment_id.to_string(),
            status: ShipmentStatus::Ready,
            messages: Vec::new(),
        })
    }

    fn await_ready(&self, shipment_id: &str, budget: Duration) -> Result<Shipment, ProviderError> {
        self.record("await_ready", shipment_id)?;
        if self.fail_on == Some("await_timeout") {
            return Err(ProviderError::Timeout {
                shipment_id: shipment_id.to_string(),
                elapsed_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(Shipment {
            id: shipment_id.to_string(),
            status: ShipmentStatus::Ready,
            messages: Vec::new(),
        })
    }

    fn get_rates(&self, shipment_id: &str) -> Result<Vec<CarrierRate>, ProviderError> {
        self.record("get_rates", shipment_id)?;
        Ok(self.rates.clone())
    }
}

/// Builds an orchestrator over a recording provider with a US home country.
pub fn orchestrator(provider: Arc<RecordingProvider>, allow: &[&str]) -> ShipmentOrchestrator {
    ShipmentOrchestrator::new(
        provider,
        CustomsAssembler::new(customs_settings(), CountryClassifier::default()),
        RateFormatter::new(AllowList::parse(allow).unwrap(), 0.0),
        ShippingSettings {
            sender: ShipmentAddress {
                name: "Sam Sender".to_string(),
                country: "US".to_string(),
                ..ShipmentAddress::default()
            },
            ..ShippingSettings::default()
        },
    )
}
