// crates/parcel-gate-providers/src/lib.rs
// ============================================================================
// Module: Parcel Gate Providers
// Description: Rate provider bindings, webhook validator, and registry.
// Purpose: Implement the core's provider seams over blocking HTTP clients.
// Dependencies: parcel-gate-core, parcel-gate-config, reqwest, serde, base64
// ============================================================================

//! ## Overview
//! This crate ships the concrete [`parcel_gate_core::RateProvider`]
//! implementations (Shippo and EasyPost), the checkout platform's
//! [`parcel_gate_core::RequestValidator`], and a registry that builds the
//! configured provider.
//! Invariants:
//! - Clients never follow redirects and bound every response body.
//! - Credentials never appear in errors or logs.
//!
//! Security posture: provider responses are untrusted and fail closed on
//! anything that does not decode.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod easypost;
pub mod http;
pub mod platform;
pub mod poll;
pub mod registry;
pub mod shippo;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use easypost::EasyPostProvider;
pub use http::ApiClient;
pub use http::Auth;
pub use http::HttpSettings;
pub use platform::PlatformValidator;
pub use poll::PollSettings;
pub use registry::build_rate_provider;
pub use registry::build_request_validator;
pub use shippo::ShippoProvider;
