// crates/parcel-gate-core/src/order.rs
// ============================================================================
// Module: Checkout Order Model
// Description: Order, address, and line item snapshots from checkout webhooks.
// Purpose: Decode the loosely-typed platform order document into typed values.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The upstream platform sends a large, loosely-typed order document. Only
//! the fields the pipeline reads are modeled here; everything else is
//! ignored. Decoding is lenient: absent fields and JSON `null` numbers take
//! their defaults so optional data never fails the request.
//! Invariants:
//! - An [`Order`] is immutable once decoded.
//! - Weights are grams, as sent by the platform.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Custom field name carrying a harmonized-system tariff code.
pub const HS_CODE_FIELD: &str = "hs_code";

/// Separator between shipment and rate ids in a composite rate id.
pub const RATE_ID_SEPARATOR: char = ';';

// ============================================================================
// SECTION: Order
// ============================================================================

/// Order snapshot carried by rate, tax, and completion webhooks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    /// Opaque platform order token.
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    /// Human-facing invoice number.
    #[serde(deserialize_with = "null_as_default")]
    pub invoice_number: String,
    /// ISO currency code.
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// Customer email.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Ship-to address.
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_address: Address,
    /// Bill-to address.
    #[serde(deserialize_with = "null_as_default")]
    pub billing_address: Address,
    /// True when the order ships to the billing address.
    #[serde(deserialize_with = "null_as_default")]
    pub ship_to_billing_address: bool,
    /// Line items in cart order.
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
    /// Total order weight in grams.
    #[serde(deserialize_with = "null_as_default")]
    pub total_weight: f64,
    /// Sum of line item totals.
    #[serde(deserialize_with = "null_as_default")]
    pub items_total: f64,
    /// Grand total charged.
    #[serde(deserialize_with = "null_as_default")]
    pub grand_total: f64,
    /// Taxes already applied.
    #[serde(deserialize_with = "null_as_default")]
    pub taxes_total: f64,
    /// Shipping cost already applied.
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_fees: f64,
    /// Composite id of a previously chosen rate (`<shipment-id>;<rate-id>`).
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_rate_user_defined_id: Option<String>,
}

impl Order {
    /// Returns the destination country of the shipment.
    #[must_use]
    pub fn destination_country(&self) -> &str {
        &self.shipment_address().country
    }

    /// Returns the address goods are shipped to.
    #[must_use]
    pub const fn shipment_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Returns the address used for tax purposes.
    ///
    /// The bill-to address is used when the order ships to it; otherwise the
    /// ship-to address is used.
    #[must_use]
    pub const fn taxable_address(&self) -> &Address {
        if self.ship_to_billing_address { &self.billing_address } else { &self.shipping_address }
    }

    /// Returns the shippable line items.
    pub fn shippable_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|item| item.shippable)
    }

    /// Returns the prior composite rate id, if one was supplied and is non-blank.
    #[must_use]
    pub fn prior_rate_id(&self) -> Option<&str> {
        self.shipping_rate_user_defined_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

// ============================================================================
// SECTION: Address
// ============================================================================

/// Postal address as sent by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Recipient full name.
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    /// Recipient name (older payloads).
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Company name.
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    /// First street line.
    #[serde(deserialize_with = "null_as_default")]
    pub address1: String,
    /// Second street line.
    #[serde(deserialize_with = "null_as_default")]
    pub address2: String,
    /// City.
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    /// State or province code.
    #[serde(deserialize_with = "null_as_default")]
    pub province: String,
    /// Postal code.
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    /// ISO country code.
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    /// Phone number.
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

impl Address {
    /// Returns the recipient name, preferring the full name when present.
    #[must_use]
    pub fn recipient(&self) -> &str {
        if self.full_name.trim().is_empty() { self.name.trim() } else { self.full_name.trim() }
    }
}

// ============================================================================
// SECTION: Line Items
// ============================================================================

/// Cart line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    /// Product SKU.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Quantity ordered.
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: u32,
    /// Unit price.
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    /// Line total.
    #[serde(deserialize_with = "null_as_default")]
    pub total_price: f64,
    /// Unit weight in grams.
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
    /// False for digital or otherwise non-shipped goods.
    #[serde(deserialize_with = "null_as_true")]
    pub shippable: bool,
    /// Arbitrary merchant-defined fields.
    #[serde(deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl LineItem {
    /// Returns the tariff code from the `hs_code` custom field.
    ///
    /// When the field appears more than once the last non-blank value wins.
    #[must_use]
    pub fn hs_code(&self) -> Option<&str> {
        self.custom_fields
            .iter()
            .rev()
            .filter(|field| field.name == HS_CODE_FIELD)
            .map(|field| field.value.trim())
            .find(|value| !value.is_empty())
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            quantity: 0,
            price: 0.0,
            total_price: 0.0,
            weight: 0.0,
            shippable: true,
            custom_fields: Vec::new(),
        }
    }
}

/// Merchant-defined key/value field on a line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    /// Field name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Field value as entered.
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserializes `null` as `true`.
fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|value| value.unwrap_or(true))
}
