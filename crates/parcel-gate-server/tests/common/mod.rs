// crates/parcel-gate-server/tests/common/mod.rs
// ============================================================================
// Module: Server Test Helpers
// Description: In-memory validator, provider, audit sink, and webhook bodies.
// Purpose: Drive the webhook router without network dependencies.
// ============================================================================

//! Shared helpers for `parcel-gate-server` integration tests.

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers may panic on poisoned locks."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use parcel_gate_core::AllowList;
use parcel_gate_core::CarrierRate;
use parcel_gate_core::CountryClassifier;
use parcel_gate_core::CustomsAssembler;
use parcel_gate_core::CustomsDeclaration;
use parcel_gate_core::CustomsItem;
use parcel_gate_core::CustomsSettings;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateFormatter;
use parcel_gate_core::RateProvider;
use parcel_gate_core::RequestValidator;
use parcel_gate_core::Shipment;
use parcel_gate_core::ShipmentOrchestrator;
use parcel_gate_core::ShipmentRequest;
use parcel_gate_core::ShipmentStatus;
use parcel_gate_core::ShippingSettings;
use parcel_gate_core::TaxAssessor;
use parcel_gate_core::ValidationError;
use parcel_gate_server::AuditSink;
use parcel_gate_server::WebhookAuditEvent;
use parcel_gate_server::WebhookRouter;
use parcel_gate_server::WebhookRouterParts;
use serde_json::Value;
use serde_json::json;

/// Token the test validator accepts.
pub const GOOD_TOKEN: &str = "good-token";

/// Validator accepting only [`GOOD_TOKEN`].
pub struct StaticValidator;

impl RequestValidator for StaticValidator {
    fn validate(&self, token: &str) -> Result<(), ValidationError> {
        if token == GOOD_TOKEN {
            Ok(())
        } else {
            Err(ValidationError::Rejected("platform answered 404".to_string()))
        }
    }
}

/// Provider answering with fixed rates and recording calls.
pub struct StubProvider {
    /// Calls in order.
    pub calls: Mutex<Vec<String>>,
    /// Rates returned for every shipment.
    pub rates: Vec<CarrierRate>,
    /// Fail shipment creation when set.
    pub fail_create: bool,
}

impl StubProvider {
    /// Creates a provider returning two USPS rates.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            rates: vec![rate("R1", "12.00"), rate("R2", "7.50")],
            fail_create: false,
        }
    }

    /// Makes shipment creation fail.
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::new()
        }
    }

    /// Returns a snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Records a call.
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

/// Builds a USPS rate.
fn rate(id: &str, amount: &str) -> CarrierRate {
    CarrierRate {
        id: id.to_string(),
        carrier: "USPS".to_string(),
        service: "Priority".to_string(),
        service_token: None,
        amount: amount.to_string(),
        currency: "USD".to_string(),
        estimated_days: Some(2),
        guaranteed: false,
    }
}

impl RateProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn create_customs_item(&self, item: &CustomsItem) -> Result<String, ProviderError> {
        self.record("create_customs_item");
        Ok(format!("ITEM-{}", item.description))
    }

    fn create_customs_declaration(
        &self,
        _declaration: &CustomsDeclaration,
    ) -> Result<String, ProviderError> {
        self.record("create_customs_declaration");
        Ok("DECL-1".to_string())
    }

    fn create_shipment(&self, _request: &ShipmentRequest) -> Result<Shipment, ProviderError> {
        self.record("create_shipment");
        if self.fail_create {
            return Err(ProviderError::Rejected {
                status: 400,
                message: "address invalid".to_string(),
            });
        }
        Ok(Shipment {
            id: "SHIP-NEW".to_string(),
            status: ShipmentStatus::Queued,
            messages: Vec::new(),
        })
    }

    fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, ProviderError> {
        self.record("get_shipment");
        Ok(Shipment {
            id: shipment_id.to_string(),
            status: ShipmentStatus::Ready,
            messages: Vec::new(),
        })
    }

    fn await_ready(&self, shipment_id: &str, _budget: Duration) -> Result<Shipment, ProviderError> {
        self.record("await_ready");
        Ok(Shipment {
            id: shipment_id.to_string(),
            status: ShipmentStatus::Ready,
            messages: Vec::new(),
        })
    }

    fn get_rates(&self, _shipment_id: &str) -> Result<Vec<CarrierRate>, ProviderError> {
        self.record("get_rates");
        Ok(self.rates.clone())
    }
}

/// Audit sink keeping events in memory.
#[derive(Default)]
pub struct MemoryAudit {
    /// Recorded events.
    pub events: Mutex<Vec<WebhookAuditEvent>>,
}

impl MemoryAudit {
    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<WebhookAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: &WebhookAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Router options for tests.
pub struct RouterOptions {
    /// Check recipient names.
    pub validate_recipient_name: bool,
    /// Maximum accepted body size.
    pub max_body_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            validate_recipient_name: false,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Builds a router over the stub provider and memory audit sink.
pub fn router(
    provider: Arc<StubProvider>,
    audit: Arc<MemoryAudit>,
    options: RouterOptions,
) -> WebhookRouter {
    let orchestrator = ShipmentOrchestrator::new(
        provider,
        CustomsAssembler::new(
            CustomsSettings {
                certifier: "Sam Sender".to_string(),
                ein: "12-3456789".to_string(),
                ioss: "IM7240000001".to_string(),
                ..CustomsSettings::default()
            },
            CountryClassifier::default(),
        ),
        RateFormatter::new(AllowList::default(), 0.0),
        ShippingSettings::default(),
    );
    WebhookRouter::new(WebhookRouterParts {
        validator: Arc::new(StaticValidator),
        orchestrator,
        tax: TaxAssessor::default(),
        validate_recipient_name: options.validate_recipient_name,
        max_body_bytes: options.max_body_bytes,
        audit,
    })
}

/// Builds an order payload shipping one item to `country`.
pub fn order(country: &str, recipient: &str) -> Value {
    json!({
        "token": "order-token",
        "invoiceNumber": "SNIP-2001",
        "currency": "usd",
        "email": "jane@example.com",
        "shippingAddress": {
            "fullName": recipient,
            "address1": "1 Main St",
            "city": "Springfield",
            "province": "NH",
            "postalCode": "03101",
            "country": country
        },
        "billingAddress": {
            "fullName": recipient,
            "country": country
        },
        "items": [{
            "id": "SKU-1",
            "name": "Pedal",
            "quantity": 1,
            "price": 100.0,
            "totalPrice": 100.0,
            "weight": 500.0,
            "shippable": true,
            "customFields": []
        }],
        "totalWeight": 500.0,
        "itemsTotal": 100.0
    })
}

/// Serializes a webhook envelope.
pub fn envelope(event_name: &str, content: &Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "eventName": event_name,
        "createdOn": "2024-03-01T10:00:00Z",
        "content": content
    }))
    .unwrap()
}
