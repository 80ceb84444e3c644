// crates/parcel-gate-core/src/tax.rs
// ============================================================================
// Module: Tax Assessor
// Description: Sales-tax lines for checkout tax webhooks.
// Purpose: Apply EU VAT or the flat domestic default to an order total.
// Dependencies: serde, crate::{country, order, units}
// ============================================================================

//! ## Overview
//! Tax assessment never fails and never returns an empty list: EU addresses
//! get a single VAT line at the member state's standard rate, everything else
//! (including the United Kingdom) gets a single zero-rate line carrying the
//! configured domestic notice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::country::vat_rate;
use crate::order::Address;
use crate::order::Order;
use crate::units::round2;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default name of the zero-rate domestic tax line.
pub const DEFAULT_DOMESTIC_TAX_NAME: &str =
    "New Hampshire (company does not meet threshold for sales tax in your state)";

/// Default invoice number of the zero-rate domestic tax line.
pub const DEFAULT_DOMESTIC_INVOICE_NUMBER: &str = "TAX-000";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One tax line in the checkout platform's response contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    /// Display name.
    pub name: String,
    /// Tax amount, rounded to two decimals.
    pub amount: f64,
    /// Invoice reference.
    pub number_for_invoice: String,
    /// Rate applied, as a fraction.
    pub rate: f64,
}

/// Tax configuration passed to the assessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Name of the zero-rate domestic line.
    pub domestic_name: String,
    /// Invoice number of the zero-rate domestic line.
    pub domestic_invoice_number: String,
    /// Per-country VAT rate overrides, keyed by upper-case ISO code.
    pub vat_overrides: BTreeMap<String, f64>,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            domestic_name: DEFAULT_DOMESTIC_TAX_NAME.to_string(),
            domestic_invoice_number: DEFAULT_DOMESTIC_INVOICE_NUMBER.to_string(),
            vat_overrides: BTreeMap::new(),
        }
    }
}

// ============================================================================
// SECTION: Assessor
// ============================================================================

/// Computes tax lines for an address and item total.
#[derive(Debug, Clone, Default)]
pub struct TaxAssessor {
    /// Tax configuration.
    settings: TaxSettings,
}

impl TaxAssessor {
    /// Creates an assessor from explicit settings.
    #[must_use]
    pub const fn new(settings: TaxSettings) -> Self {
        Self {
            settings,
        }
    }

    /// Assesses the order's taxable address and item total.
    #[must_use]
    pub fn assess_order(&self, order: &Order) -> Vec<TaxLine> {
        self.assess(order.taxable_address(), order.items_total)
    }

    /// Assesses tax for an address and item total.
    #[must_use]
    pub fn assess(&self, address: &Address, items_total: f64) -> Vec<TaxLine> {
        let country = address.country.trim().to_ascii_uppercase();
        match self.rate_for(&country) {
            Some(rate) => vec![TaxLine {
                name: format!("VAT ({country})"),
                amount: round2(items_total * rate),
                number_for_invoice: format!("VAT-{country}-{:.0}%", rate * 100.0),
                rate,
            }],
            None => vec![TaxLine {
                name: self.settings.domestic_name.clone(),
                amount: 0.0,
                number_for_invoice: self.settings.domestic_invoice_number.clone(),
                rate: 0.0,
            }],
        }
    }

    /// Returns the VAT rate for an EU country, honoring overrides.
    fn rate_for(&self, country: &str) -> Option<f64> {
        let standard = vat_rate(country)?;
        Some(self.settings.vat_overrides.get(country).copied().unwrap_or(standard))
    }
}
