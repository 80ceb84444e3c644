// crates/parcel-gate-core/src/validation.rs
// ============================================================================
// Module: Checkout Validation
// Description: Recipient-name checks answered as checkout shipping errors.
// Purpose: Reject carrier-unfriendly names before contacting a provider.
// Dependencies: serde, crate::order
// ============================================================================

//! ## Overview
//! Carriers refuse labels whose recipient is a single word or starts with a
//! very short first name. When enabled, the rate webhook answers such orders
//! with a shipping-errors document instead of rates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::order::Address;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum words in a recipient name.
const MIN_NAME_WORDS: usize = 2;

/// First names must be longer than this many characters.
const MIN_FIRST_NAME_CHARS: usize = 2;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Checkout shipping-errors response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingErrors {
    /// Errors shown to the shopper.
    pub errors: Vec<ShippingErrorEntry>,
}

/// One shopper-facing shipping error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingErrorEntry {
    /// Stable error key.
    pub key: String,
    /// Shopper-facing message.
    pub message: String,
}

impl ShippingErrors {
    /// Creates a response holding a single error.
    #[must_use]
    pub fn single(key: &str, message: &str) -> Self {
        Self {
            errors: vec![ShippingErrorEntry {
                key: key.to_string(),
                message: message.to_string(),
            }],
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Checks the recipient name of a ship-to address.
///
/// Returns `None` when the name is acceptable.
#[must_use]
pub fn validate_recipient_name(address: &Address) -> Option<ShippingErrors> {
    let words: Vec<&str> = address.recipient().split_whitespace().collect();
    if words.len() < MIN_NAME_WORDS {
        return Some(ShippingErrors::single(
            "invalid_address_name",
            "Shipping Address name must be at least two words (ex. 'Jon D', 'Jon Doe')",
        ));
    }
    if words[0].chars().count() <= MIN_FIRST_NAME_CHARS {
        return Some(ShippingErrors::single(
            "invalid_address_firstname_length",
            "Shipping Address first name must be longer than two characters (ex: 'Jon')",
        ));
    }
    None
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions on expected errors.")]

    use super::validate_recipient_name;
    use crate::order::Address;

    fn named(name: &str) -> Address {
        Address {
            full_name: name.to_string(),
            ..Address::default()
        }
    }

    #[test]
    fn single_word_names_are_rejected() {
        let errors = validate_recipient_name(&named("Madonna")).unwrap();
        assert_eq!(errors.errors[0].key, "invalid_address_name");
    }

    #[test]
    fn short_first_names_are_rejected() {
        let errors = validate_recipient_name(&named("Jo Doe")).unwrap();
        assert_eq!(errors.errors[0].key, "invalid_address_firstname_length");
    }

    #[test]
    fn ordinary_names_pass() {
        assert!(validate_recipient_name(&named("Jon D")).is_none());
        assert!(validate_recipient_name(&named("  Jane   Doe ")).is_none());
    }
}
