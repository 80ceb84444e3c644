// crates/parcel-gate-core/src/country.rs
// ============================================================================
// Module: Country Classifier
// Description: Domestic, EU membership, and VAT rate lookups by ISO code.
// Purpose: Answer jurisdiction questions for customs and tax decisions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Pure lookups keyed by ISO 3166-1 alpha-2 country codes. Codes are compared
//! case-insensitively. Unknown codes are simply "not EU" and have no VAT rate;
//! nothing in this module can fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Home country used when configuration does not name one.
pub const DEFAULT_HOME_COUNTRY: &str = "US";

/// Standard VAT rates for EU member states, keyed by upper-case ISO code.
///
/// # Invariants
/// - Exactly the 27 EU member states are listed.
/// - Every rate is within `[0, 1)`.
pub const EU_VAT_RATES: &[(&str, f64)] = &[
    ("AT", 0.20),
    ("BE", 0.21),
    ("BG", 0.20),
    ("HR", 0.25),
    ("CY", 0.19),
    ("CZ", 0.21),
    ("DK", 0.25),
    ("EE", 0.22),
    ("FI", 0.255),
    ("FR", 0.20),
    ("DE", 0.19),
    ("GR", 0.24),
    ("HU", 0.27),
    ("IE", 0.23),
    ("IT", 0.22),
    ("LV", 0.21),
    ("LT", 0.21),
    ("LU", 0.17),
    ("MT", 0.18),
    ("NL", 0.21),
    ("PL", 0.23),
    ("PT", 0.23),
    ("RO", 0.19),
    ("SK", 0.23),
    ("SI", 0.22),
    ("ES", 0.21),
    ("SE", 0.25),
];

// ============================================================================
// SECTION: Free Functions
// ============================================================================

/// Returns true when `code` names an EU member state.
#[must_use]
pub fn is_eu_country(code: &str) -> bool {
    vat_rate(code).is_some()
}

/// Returns the standard VAT rate for an EU member state.
#[must_use]
pub fn vat_rate(code: &str) -> Option<f64> {
    let code = code.trim();
    EU_VAT_RATES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(code))
        .map(|(_, rate)| *rate)
}

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classifies destinations relative to the sender's home country.
///
/// # Invariants
/// - `home_country` is compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryClassifier {
    /// ISO code of the sender's home country.
    home_country: String,
}

impl CountryClassifier {
    /// Creates a classifier for the given home country.
    #[must_use]
    pub fn new(home_country: impl Into<String>) -> Self {
        Self {
            home_country: home_country.into(),
        }
    }

    /// Returns the configured home country code.
    #[must_use]
    pub fn home_country(&self) -> &str {
        &self.home_country
    }

    /// Returns true when `code` is the home country.
    #[must_use]
    pub fn is_domestic(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(self.home_country.trim())
    }

    /// Returns true when `code` is anything other than the home country.
    #[must_use]
    pub fn is_international(&self, code: &str) -> bool {
        !self.is_domestic(code)
    }
}

impl Default for CountryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_COUNTRY)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
