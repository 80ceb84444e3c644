// crates/parcel-gate-core/src/customs.rs
// ============================================================================
// Module: Customs Assembler
// Description: Customs items and declarations for international shipments.
// Purpose: Derive jurisdiction-specific customs paperwork from an order.
// Dependencies: serde, crate::{country, order, shipment, units}
// ============================================================================

//! ## Overview
//! International shipments need one customs item per shippable line item and
//! a single declaration referencing them. The export-control code depends on
//! the destination (Canada has its own exemption) and EU destinations declare
//! the seller's IOSS number instead of the US EIN.
//! Invariants:
//! - Domestic orders never produce customs items.
//! - Non-shippable items are never declared.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::country::CountryClassifier;
use crate::country::is_eu_country;
use crate::order::Order;
use crate::shipment::ContentsType;
use crate::shipment::CustomsDeclaration;
use crate::shipment::CustomsItem;
use crate::shipment::ExportCode;
use crate::shipment::Incoterm;
use crate::shipment::NonDeliveryOption;
use crate::shipment::TaxIdKind;
use crate::shipment::TaxIdentifier;
use crate::units::WeightUnit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Country whose exports use the `NOEEI 30.36` exemption.
const CANADA: &str = "CA";

/// Restriction type declared on every shipment.
const RESTRICTION_NONE: &str = "none";

/// Default issuing country for the IOSS number.
pub const DEFAULT_IOSS_ISSUING_COUNTRY: &str = "ES";

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Customs configuration passed to the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsSettings {
    /// Person certifying customs declarations.
    pub certifier: String,
    /// US employer identification number of the exporter.
    pub ein: String,
    /// EU import one-stop-shop number.
    pub ioss: String,
    /// Country that issued the IOSS number.
    pub ioss_issuing_country: String,
    /// Country of origin declared on customs items.
    pub origin_country: String,
    /// Policy for undeliverable parcels.
    pub non_delivery: NonDeliveryOption,
    /// Contents classification.
    pub contents_type: ContentsType,
    /// Unit for declared item weights.
    pub weight_unit: WeightUnit,
}

impl Default for CustomsSettings {
    fn default() -> Self {
        Self {
            certifier: String::new(),
            ein: String::new(),
            ioss: String::new(),
            ioss_issuing_country: DEFAULT_IOSS_ISSUING_COUNTRY.to_string(),
            origin_country: crate::country::DEFAULT_HOME_COUNTRY.to_string(),
            non_delivery: NonDeliveryOption::Return,
            contents_type: ContentsType::Merchandise,
            weight_unit: WeightUnit::Oz,
        }
    }
}

// ============================================================================
// SECTION: Assembler
// ============================================================================

/// Builds customs paperwork for international orders.
#[derive(Debug, Clone)]
pub struct CustomsAssembler {
    /// Customs configuration.
    settings: CustomsSettings,
    /// Domestic/international classifier.
    classifier: CountryClassifier,
}

impl CustomsAssembler {
    /// Creates an assembler from explicit settings.
    #[must_use]
    pub const fn new(settings: CustomsSettings, classifier: CountryClassifier) -> Self {
        Self {
            settings,
            classifier,
        }
    }

    /// Returns the classifier used for destination checks.
    #[must_use]
    pub const fn classifier(&self) -> &CountryClassifier {
        &self.classifier
    }

    /// Returns true when the order needs customs paperwork.
    #[must_use]
    pub fn requires_customs(&self, order: &Order) -> bool {
        self.classifier.is_international(order.destination_country())
    }

    /// Builds one customs item per shippable line item.
    ///
    /// Returns an empty list for domestic destinations.
    #[must_use]
    pub fn build_customs_items(&self, order: &Order) -> Vec<CustomsItem> {
        if !self.requires_customs(order) {
            return Vec::new();
        }
        let currency = order.currency.trim().to_ascii_uppercase();
        order
            .shippable_items()
            .map(|item| CustomsItem {
                description: item.name.clone(),
                quantity: item.quantity,
                weight: self.settings.weight_unit.from_grams(item.weight),
                weight_unit: self.settings.weight_unit,
                value: item.total_price,
                currency: currency.clone(),
                origin_country: self.settings.origin_country.clone(),
                tariff_number: item.hs_code().map(ToString::to_string),
                order_reference: order.invoice_number.clone(),
            })
            .collect()
    }

    /// Builds the aggregate declaration for previously created items.
    #[must_use]
    pub fn build_customs_declaration(
        &self,
        order: &Order,
        item_ids: Vec<String>,
    ) -> CustomsDeclaration {
        let country = order.destination_country();
        let exporter_tax_id = self.exporter_tax_id(country);
        let vat_collected = exporter_tax_id.kind == TaxIdKind::Ioss;
        CustomsDeclaration {
            item_ids,
            certify: true,
            certifier: self.settings.certifier.clone(),
            non_delivery: self.settings.non_delivery,
            contents_type: self.settings.contents_type,
            restriction_type: RESTRICTION_NONE.to_string(),
            incoterm: Incoterm::Ddu,
            export_code: export_code(country),
            exporter_tax_id,
            vat_collected,
        }
    }

    /// Returns the exporter identifier declared for a destination.
    #[must_use]
    pub fn exporter_tax_id(&self, country: &str) -> TaxIdentifier {
        if is_eu_country(country) {
            TaxIdentifier {
                kind: TaxIdKind::Ioss,
                number: self.settings.ioss.clone(),
                issuing_country: self.settings.ioss_issuing_country.clone(),
            }
        } else {
            TaxIdentifier {
                kind: TaxIdKind::Ein,
                number: self.settings.ein.clone(),
                issuing_country: self.classifier.home_country().to_string(),
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the export-control exemption for an international destination.
#[must_use]
pub fn export_code(country: &str) -> ExportCode {
    if country.trim().eq_ignore_ascii_case(CANADA) {
        ExportCode::Noeei3036
    } else {
        ExportCode::Noeei3037a
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
