// crates/parcel-gate-core/src/units.rs
// ============================================================================
// Module: Measurement Units
// Description: Weight and dimension units used on provider requests.
// Purpose: Convert gram-denominated order weights into the configured unit.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Checkout platforms report weights in grams. Providers accept a handful of
//! units, selected by configuration; conversions round to two decimals so the
//! values match what the provider displays.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Grams per avoirdupois ounce, as used by carriers.
const GRAMS_PER_OUNCE: f64 = 28.35;
/// Grams per avoirdupois pound.
const GRAMS_PER_POUND: f64 = 453.592;
/// Grams per kilogram.
const GRAMS_PER_KILOGRAM: f64 = 1_000.0;
/// Centimeters per inch.
const CM_PER_INCH: f64 = 2.54;

// ============================================================================
// SECTION: Weight
// ============================================================================

/// Weight unit for parcels and customs items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Grams.
    G,
    /// Kilograms.
    Kg,
    /// Ounces.
    #[default]
    Oz,
    /// Pounds.
    Lb,
}

impl WeightUnit {
    /// Returns the wire label for the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Kg => "kg",
            Self::Oz => "oz",
            Self::Lb => "lb",
        }
    }

    /// Converts a gram weight into this unit, rounded to two decimals.
    #[must_use]
    pub fn from_grams(self, grams: f64) -> f64 {
        let value = match self {
            Self::G => grams,
            Self::Kg => grams / GRAMS_PER_KILOGRAM,
            Self::Oz => grams / GRAMS_PER_OUNCE,
            Self::Lb => grams / GRAMS_PER_POUND,
        };
        round2(value)
    }

    /// Converts a weight in this unit back to grams, unrounded.
    #[must_use]
    pub fn to_grams(self, value: f64) -> f64 {
        match self {
            Self::G => value,
            Self::Kg => value * GRAMS_PER_KILOGRAM,
            Self::Oz => value * GRAMS_PER_OUNCE,
            Self::Lb => value * GRAMS_PER_POUND,
        }
    }
}

// ============================================================================
// SECTION: Dimension
// ============================================================================

/// Distance unit for parcel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    /// Inches.
    #[default]
    In,
    /// Feet.
    Ft,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Meters.
    M,
}

impl DimensionUnit {
    /// Returns the wire label for the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Ft => "ft",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::M => "m",
        }
    }

    /// Converts a length in this unit to inches, rounded to two decimals.
    #[must_use]
    pub fn to_inches(self, value: f64) -> f64 {
        let inches = match self {
            Self::In => value,
            Self::Ft => value * 12.0,
            Self::Cm => value / CM_PER_INCH,
            Self::Mm => value / (CM_PER_INCH * 10.0),
            Self::M => value * 100.0 / CM_PER_INCH,
        };
        round2(inches)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rounds a value to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
