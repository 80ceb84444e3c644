// crates/parcel-gate-core/src/rates.rs
// ============================================================================
// Module: Rate Formatter
// Description: Allow-list filtering, discounting, and description of rates.
// Purpose: Turn raw carrier rates into the checkout platform's rate contract.
// Dependencies: serde, thiserror, tracing, crate::{order, shipment, units}
// ============================================================================

//! ## Overview
//! Raw provider rates are filtered by the configured allow-list, discounted by
//! a flat amount (never below zero), given a human-readable description, and
//! stably sorted by ascending cost. Each output rate carries a composite id
//! `<shipment-id>;<rate-id>` that the platform replays on later requests so the
//! shipment can be reused instead of recreated.
//! Invariants:
//! - Output costs are never negative.
//! - Output order is non-decreasing by cost; ties keep provider order.
//! - One malformed amount fails the whole batch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::order::RATE_ID_SEPARATOR;
use crate::shipment::CarrierRate;
use crate::units::round2;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between carrier and service level in an allow-list entry.
const ALLOW_ENTRY_SEPARATOR: char = ':';
/// Longest accepted provider object id.
const MAX_OBJECT_ID_LEN: usize = 128;

/// Carrier account codes and their public display names.
const CARRIER_ALIASES: &[(&str, &str)] = &[
    ("UPSDAP", "UPS"),
    ("UPS", "UPS"),
    ("FedExDefault", "FedEx"),
    ("FEDEX", "FedEx"),
    ("FedEx", "FedEx"),
    ("DHLExpress", "DHL Express"),
    ("DHL_EXPRESS", "DHL Express"),
    ("CanadaPost", "Canada Post"),
    ("CANADA_POST", "Canada Post"),
    ("USPS", "USPS"),
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rate formatting errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// A provider rate carried an amount that is not a finite decimal.
    #[error("rate {rate_id} has invalid amount '{amount}'")]
    InvalidAmount {
        /// Provider rate id.
        rate_id: String,
        /// Amount as sent by the provider.
        amount: String,
    },
    /// A composite rate id could not be split into its parts.
    #[error("invalid composite rate id '{0}'")]
    InvalidRateId(String),
    /// An allow-list entry is malformed.
    #[error("invalid allow-list entry '{0}'")]
    InvalidAllowEntry(String),
}

// ============================================================================
// SECTION: Output Rate
// ============================================================================

/// Shipping rate in the checkout platform's response contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRate {
    /// Composite `<shipment-id>;<rate-id>` identifier.
    pub user_defined_id: String,
    /// Discounted cost, never negative.
    pub cost: f64,
    /// Human-readable description.
    pub description: String,
}

/// Composite rate identifier replayed by the checkout platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateId {
    /// Provider shipment id.
    pub shipment_id: String,
    /// Provider rate id; may be empty when only the shipment is known.
    pub rate_id: String,
}

impl RateId {
    /// Creates a composite id from its parts.
    #[must_use]
    pub fn new(shipment_id: impl Into<String>, rate_id: impl Into<String>) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            rate_id: rate_id.into(),
        }
    }

    /// Splits a composite id at the first separator.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidRateId`] when the shipment part is empty
    /// or is not a plain provider object id (see [`is_object_id`]).
    pub fn parse(value: &str) -> Result<Self, RateError> {
        let value = value.trim();
        let (shipment_id, rate_id) =
            value.split_once(RATE_ID_SEPARATOR).unwrap_or((value, ""));
        let shipment_id = shipment_id.trim();
        if !is_object_id(shipment_id) {
            return Err(RateError::InvalidRateId(value.to_string()));
        }
        Ok(Self::new(shipment_id, rate_id.trim()))
    }
}

/// Returns true when `value` can be used as a single provider URL segment.
///
/// Provider object ids are ASCII letters, digits, `_` and `-`.
#[must_use]
pub fn is_object_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_OBJECT_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-'))
}

impl fmt::Display for RateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RATE_ID_SEPARATOR}{}", self.shipment_id, self.rate_id)
    }
}

// ============================================================================
// SECTION: Allow List
// ============================================================================

/// One parsed allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AllowEntry {
    /// Carrier code or public name, lower-cased.
    carrier: String,
    /// Service level token, lower-cased; `None` allows every service.
    service: Option<String>,
}

/// Carrier and service-level allow-list.
///
/// Entries are either a bare carrier (`"USPS"`) or a `carrier:service-level`
/// pair (`"usps:usps_priority"`). Matching ignores case. An empty list allows
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    /// Parsed entries.
    entries: Vec<AllowEntry>,
}

impl AllowList {
    /// Parses allow-list entries.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidAllowEntry`] for blank entries, entries
    /// with an empty carrier or service, or more than one separator.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, RateError> {
        let entries = entries
            .iter()
            .map(|entry| parse_allow_entry(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            entries,
        })
    }

    /// Returns true when the list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when the carrier and service level are allowed.
    #[must_use]
    pub fn allowed(&self, carrier: &str, service_level: &str) -> bool {
        if self.entries.is_empty() {
            return true;
        }
        let public = carrier_name(carrier);
        self.entries.iter().any(|entry| {
            let carrier_matches = entry.carrier.eq_ignore_ascii_case(carrier.trim())
                || entry.carrier.eq_ignore_ascii_case(public);
            carrier_matches
                && entry
                    .service
                    .as_deref()
                    .is_none_or(|service| service.eq_ignore_ascii_case(service_level.trim()))
        })
    }
}

/// Parses a single allow-list entry.
fn parse_allow_entry(raw: &str) -> Result<AllowEntry, RateError> {
    let trimmed = raw.trim();
    let invalid = || RateError::InvalidAllowEntry(raw.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }
    match trimmed.split_once(ALLOW_ENTRY_SEPARATOR) {
        None => Ok(AllowEntry {
            carrier: trimmed.to_ascii_lowercase(),
            service: None,
        }),
        Some((carrier, service)) => {
            let carrier = carrier.trim();
            let service = service.trim();
            if carrier.is_empty() || service.is_empty() || service.contains(ALLOW_ENTRY_SEPARATOR)
            {
                return Err(invalid());
            }
            Ok(AllowEntry {
                carrier: carrier.to_ascii_lowercase(),
                service: Some(service.to_ascii_lowercase()),
            })
        }
    }
}

// ============================================================================
// SECTION: Formatter
// ============================================================================

/// Filters, discounts, describes, and sorts provider rates.
#[derive(Debug, Clone, Default)]
pub struct RateFormatter {
    /// Carrier/service allow-list.
    allow_list: AllowList,
    /// Flat discount subtracted from every rate.
    discount: f64,
}

impl RateFormatter {
    /// Creates a formatter with an allow-list and flat discount.
    #[must_use]
    pub const fn new(allow_list: AllowList, discount: f64) -> Self {
        Self {
            allow_list,
            discount,
        }
    }

    /// Formats raw rates for a shipment into output rates.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidAmount`] when an allowed rate's amount is
    /// not a finite decimal.
    pub fn format(
        &self,
        shipment_id: &str,
        rates: &[CarrierRate],
    ) -> Result<Vec<ShippingRate>, RateError> {
        let mut output = Vec::with_capacity(rates.len());
        for rate in rates {
            if !self.allow_list.allowed(&rate.carrier, rate.service_level()) {
                debug!(
                    carrier = %rate.carrier,
                    service_level = %rate.service_level(),
                    "rate skipped by allow-list"
                );
                continue;
            }
            let amount = parse_amount(rate)?;
            output.push(ShippingRate {
                user_defined_id: RateId::new(shipment_id, rate.id.as_str()).to_string(),
                cost: round2(discount(amount, self.discount)),
                description: describe(
                    &rate.carrier,
                    &rate.service,
                    rate.estimated_days.unwrap_or(0),
                    rate.guaranteed,
                ),
            });
        }
        output.sort_by(|left, right| left.cost.total_cmp(&right.cost));
        Ok(output)
    }
}

/// Parses a provider amount string.
fn parse_amount(rate: &CarrierRate) -> Result<f64, RateError> {
    rate.amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RateError::InvalidAmount {
            rate_id: rate.id.clone(),
            amount: rate.amount.clone(),
        })
}

// ============================================================================
// SECTION: Pure Helpers
// ============================================================================

/// Subtracts a flat discount, flooring the result at zero.
#[must_use]
pub fn discount(cost: f64, amount: f64) -> f64 {
    (cost - amount).max(0.0)
}

/// Builds the human-readable description of a carrier service.
///
/// The carrier code is mapped to its public name, carrier-specific service
/// prefixes are stripped, machine-cased service codes are split into
/// title-cased words, and a delivery estimate is appended when `days > 0`.
/// Service words that repeat the end of the carrier name are dropped.
#[must_use]
pub fn describe(carrier: &str, service: &str, days: u32, guaranteed: bool) -> String {
    let carrier_display = carrier_name(carrier);
    let service_words = service_words(&strip_service_prefix(carrier, service));
    let service_display = drop_repeated_words(carrier_display, &service_words);
    let mut description = if service_display.is_empty() {
        carrier_display.to_string()
    } else {
        format!("{carrier_display} {service_display}")
    };
    if days > 0 {
        let label = if guaranteed { "Guaranteed" } else { "Estimated" };
        let unit = if days == 1 { "day" } else { "days" };
        description = format!("{description} - {label} arrival {days} {unit}");
    }
    description
}

/// Drops leading service words that repeat the trailing words of the carrier name.
///
/// `DHL Express` + `Express Worldwide` reads `Worldwide`. At least one
/// service word is always kept.
fn drop_repeated_words<'a>(carrier: &str, service: &'a str) -> &'a str {
    let carrier_words: Vec<&str> = carrier.split_whitespace().collect();
    let service_words: Vec<&str> = service.split_whitespace().collect();
    let longest = carrier_words.len().min(service_words.len().saturating_sub(1));
    for overlap in (1 ..= longest).rev() {
        let tail = &carrier_words[carrier_words.len() - overlap ..];
        let head = &service_words[.. overlap];
        let repeated = tail.iter().zip(head).all(|(left, right)| left.eq_ignore_ascii_case(right));
        if repeated {
            let mut rest = service;
            for word in head {
                rest = rest.trim_start().get(word.len() ..).unwrap_or_default();
            }
            return rest.trim_start();
        }
    }
    service
}

/// Returns the public display name of a carrier code.
fn carrier_name(carrier: &str) -> &str {
    let carrier = carrier.trim();
    CARRIER_ALIASES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(carrier))
        .map_or(carrier, |(_, name)| *name)
}

/// Strips a leading carrier code or name from a service identifier.
///
/// The prefix only counts when it ends at a word boundary; an identifier
/// consisting solely of the prefix is kept unchanged.
fn strip_service_prefix(carrier: &str, service: &str) -> String {
    let service = service.trim();
    let public = carrier_name(carrier);
    let compact_public: String = public.chars().filter(|ch| !ch.is_whitespace()).collect();
    let candidates = [carrier.trim(), public, compact_public.as_str()];
    for prefix in candidates {
        if prefix.is_empty() || service.len() <= prefix.len() {
            continue;
        }
        let Some(head) = service.get(.. prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &service[prefix.len() ..];
        let at_boundary = rest
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_uppercase() || matches!(ch, '_' | '-' | ' '));
        if !at_boundary {
            continue;
        }
        let rest = rest.trim_start_matches(['_', '-', ' ']);
        if !rest.is_empty() {
            return rest.to_string();
        }
    }
    service.to_string()
}

/// Splits a service identifier into title-cased words.
fn service_words(service: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in service.split(['_', '-', ' ']).filter(|chunk| !chunk.is_empty()) {
        let mut current = String::new();
        let mut previous_lower = false;
        for ch in chunk.chars() {
            if previous_lower && ch.is_ascii_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = ch.is_ascii_lowercase();
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words.iter().map(|word| title_case(word)).collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first character and lower-cases the rest.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
