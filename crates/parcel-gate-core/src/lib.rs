// crates/parcel-gate-core/src/lib.rs
// ============================================================================
// Module: Parcel Gate Core
// Description: Order-to-shipping-offer pipeline and tax assessment.
// Purpose: Provide the I/O-free domain model and pipeline stages.
// Dependencies: serde, serde_json, thiserror, time, tracing
// ============================================================================

//! ## Overview
//! `parcel-gate-core` turns a checkout order snapshot into ranked shipping
//! offers and sales-tax lines. Every stage is a plain value transformation
//! except the [`ShipmentOrchestrator`], which drives an injected
//! [`RateProvider`] through the shipment lifecycle.
//! Invariants:
//! - Components receive configuration explicitly; nothing reads global state.
//! - Provider wire formats never leak into this crate; concrete bindings live in
//!   `parcel-gate-providers`.
//!
//! Security posture: webhook payloads are untrusted and decoded leniently but
//! never executed or echoed into provider credentials.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod country;
pub mod customs;
pub mod interfaces;
pub mod order;
pub mod orchestrator;
pub mod rates;
pub mod shipment;
pub mod tax;
pub mod units;
pub mod validation;
pub mod webhook;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use country::CountryClassifier;
pub use country::DEFAULT_HOME_COUNTRY;
pub use country::EU_VAT_RATES;
pub use country::is_eu_country;
pub use country::vat_rate;
pub use customs::CustomsAssembler;
pub use customs::CustomsSettings;
pub use interfaces::ProviderError;
pub use interfaces::RateProvider;
pub use interfaces::RequestValidator;
pub use interfaces::ValidationError;
pub use order::Address;
pub use order::CustomField;
pub use order::LineItem;
pub use order::Order;
pub use orchestrator::RateQuote;
pub use orchestrator::ShipmentOrchestrator;
pub use orchestrator::ShipmentStage;
pub use orchestrator::ShippingError;
pub use orchestrator::ShippingSettings;
pub use rates::AllowList;
pub use rates::RateError;
pub use rates::RateFormatter;
pub use rates::RateId;
pub use rates::ShippingRate;
pub use rates::describe;
pub use rates::discount;
pub use rates::is_object_id;
pub use shipment::CarrierRate;
pub use shipment::ContentsType;
pub use shipment::CustomsDeclaration;
pub use shipment::CustomsItem;
pub use shipment::ExportCode;
pub use shipment::Incoterm;
pub use shipment::NonDeliveryOption;
pub use shipment::Parcel;
pub use shipment::ParcelTemplate;
pub use shipment::Shipment;
pub use shipment::ShipmentAddress;
pub use shipment::ShipmentCustoms;
pub use shipment::ShipmentRequest;
pub use shipment::ShipmentStatus;
pub use shipment::TaxIdKind;
pub use shipment::TaxIdentifier;
pub use tax::TaxAssessor;
pub use tax::TaxLine;
pub use tax::TaxSettings;
pub use units::DimensionUnit;
pub use units::WeightUnit;
pub use validation::ShippingErrorEntry;
pub use validation::ShippingErrors;
pub use validation::validate_recipient_name;
pub use webhook::EnvelopeError;
pub use webhook::ShippingRatesResponse;
pub use webhook::TaxResponse;
pub use webhook::WebhookEnvelope;
pub use webhook::WebhookEvent;
