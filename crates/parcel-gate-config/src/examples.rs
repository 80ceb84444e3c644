// crates/parcel-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for operators and tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `parcel-gate.toml`. Secrets are referenced through
//! environment variables so the example can be committed as-is.

/// Returns a canonical example `parcel-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "0.0.0.0:8080"
webhook_path = "/webhooks/snipcart"
max_body_bytes = 1048576

[server.audit]
enabled = true

[platform]
validate_url = "https://app.snipcart.com/api/requestvalidation/"
token_header = "X-Snipcart-RequestToken"
api_key_env = "SNIPCART_API_KEY"
timeout_ms = 5000

[provider]
kind = "shippo"
api_key_env = "SHIPPO_API_KEY"
timeout_ms = 10000
await_timeout_ms = 10000
poll_interval_ms = 500

[shipping]
home_country = "US"
weight_unit = "oz"
dimension_unit = "in"
discount = 5.0
allowed_services = ["USPS", "ups:ups_ground"]

[shipping.sender]
name = "Shipping Department"
company = "Example Pedals LLC"
street1 = "10 Mill Street"
city = "Concord"
state = "NH"
postal_code = "03301"
country = "US"
phone = "+1 603 555 0100"
email = "shipping@example.com"

[shipping.parcel]
length = 10.0
width = 8.0
height = 4.0

[customs]
certifier = "Alex Example"
ein = "12-3456789"
ioss = "IM7240000001"
ioss_issuing_country = "ES"
non_delivery = "return"
contents_type = "merchandise"

[tax]
domestic_invoice_number = "TAX-000"

[tax.vat_overrides]
FI = 0.255

[checkout]
validate_recipient_name = true
"#,
    )
}
