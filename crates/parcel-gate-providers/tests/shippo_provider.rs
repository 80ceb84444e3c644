// crates/parcel-gate-providers/tests/shippo_provider.rs
// ============================================================================
// Module: Shippo Provider Tests
// Description: Shippo binding against a scripted API server.
// Purpose: Pin the request shapes and response mapping of the Shippo client.
// ============================================================================

//! ## Overview
//! Each test scripts the Shippo answers, drives one provider call, and checks
//! both the mapped result and the request that reached the server.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::time::Duration;

use parcel_gate_core::ContentsType;
use parcel_gate_core::CustomsDeclaration;
use parcel_gate_core::CustomsItem;
use parcel_gate_core::ExportCode;
use parcel_gate_core::Incoterm;
use parcel_gate_core::NonDeliveryOption;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateProvider;
use parcel_gate_core::ShipmentStatus;
use parcel_gate_core::TaxIdKind;
use parcel_gate_core::TaxIdentifier;
use parcel_gate_core::WeightUnit;
use parcel_gate_providers::Auth;
use parcel_gate_providers::PollSettings;
use parcel_gate_providers::ShippoProvider;

use crate::common::ScriptedServer;
use crate::common::client;
use crate::common::ioss_customs;
use crate::common::shipment_request;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a Shippo provider against the scripted server.
fn provider(server: &ScriptedServer) -> ShippoProvider {
    ShippoProvider::new(
        client(server, Auth::ShippoToken("shippo_test_key".to_string())),
        PollSettings::from_millis(1),
    )
}

/// Renders a Shippo shipment body.
fn shipment_body(status: &str) -> String {
    format!(r#"{{"object_id":"SHIP1","status":"{status}","messages":[]}}"#)
}

// ============================================================================
// SECTION: Customs
// ============================================================================

#[test]
fn customs_item_is_posted_with_decimal_strings() {
    let server = ScriptedServer::start(vec![(201, r#"{"object_id":"ITEM1"}"#.to_string())]);
    let item = CustomsItem {
        description: "Pedal".to_string(),
        quantity: 2,
        weight: 10.0,
        weight_unit: WeightUnit::Oz,
        value: 50.0,
        currency: "USD".to_string(),
        origin_country: "US".to_string(),
        tariff_number: Some("8543.70".to_string()),
        order_reference: "SNIP-1001".to_string(),
    };

    let id = provider(&server).create_customs_item(&item).unwrap();
    let requests = server.finish();

    assert_eq!(id, "ITEM1");
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/customs/items/");
    assert_eq!(requests[0].authorization.as_deref(), Some("ShippoToken shippo_test_key"));
    let body = requests[0].json();
    assert_eq!(body["net_weight"], "10");
    assert_eq!(body["mass_unit"], "oz");
    assert_eq!(body["value_amount"], "50.00");
    assert_eq!(body["tariff_number"], "8543.70");
    assert_eq!(body["metadata"], "order:SNIP-1001");
}

#[test]
fn declaration_uses_shippo_enumerations() {
    let server = ScriptedServer::start(vec![(201, r#"{"object_id":"DECL1"}"#.to_string())]);
    let declaration = CustomsDeclaration {
        item_ids: vec!["ITEM1".to_string()],
        certify: true,
        certifier: "Sam Sender".to_string(),
        non_delivery: NonDeliveryOption::Return,
        contents_type: ContentsType::Merchandise,
        restriction_type: "none".to_string(),
        incoterm: Incoterm::Ddu,
        export_code: ExportCode::Noeei3036,
        exporter_tax_id: TaxIdentifier {
            kind: TaxIdKind::Ein,
            number: "12-3456789".to_string(),
            issuing_country: "US".to_string(),
        },
        vat_collected: false,
    };

    let id = provider(&server).create_customs_declaration(&declaration).unwrap();
    let body = server.finish()[0].json();

    assert_eq!(id, "DECL1");
    assert_eq!(body["non_delivery_option"], "RETURN");
    assert_eq!(body["contents_type"], "MERCHANDISE");
    assert_eq!(body["restriction_type"], "NONE");
    assert_eq!(body["incoterm"], "DDU");
    assert_eq!(body["eel_pfc"], "NOEEI_30_36");
    assert_eq!(body["exporter_identification"]["tax_id"]["type"], "EIN");
    assert_eq!(body["items"][0], "ITEM1");
}

// ============================================================================
// SECTION: Shipments
// ============================================================================

#[test]
fn shipment_is_created_asynchronously_with_customs() {
    let server = ScriptedServer::start(vec![(201, shipment_body("QUEUED"))]);

    let request = shipment_request(Some(ioss_customs()));
    let shipment = provider(&server).create_shipment(&request).unwrap();
    let body = server.finish()[0].json();

    assert_eq!(shipment.id, "SHIP1");
    assert_eq!(shipment.status, ShipmentStatus::Queued);
    assert_eq!(body["async"], true);
    assert_eq!(body["customs_declaration"], "DECL-1");
    assert_eq!(body["address_to"]["zip"], "10115");
    assert_eq!(body["parcels"][0]["distance_unit"], "cm");
    assert_eq!(body["parcels"][0]["mass_unit"], "lb");
}

#[test]
fn domestic_shipment_omits_customs_declaration() {
    let server = ScriptedServer::start(vec![(201, shipment_body("SUCCESS"))]);

    let shipment = provider(&server).create_shipment(&shipment_request(None)).unwrap();
    let body = server.finish()[0].json();

    assert_eq!(shipment.status, ShipmentStatus::Ready);
    assert!(body.get("customs_declaration").is_none());
}

#[test]
fn await_ready_polls_until_success() {
    let server = ScriptedServer::start(vec![
        (200, shipment_body("QUEUED")),
        (200, shipment_body("QUEUED")),
        (200, shipment_body("SUCCESS")),
    ]);

    let shipment = provider(&server).await_ready("SHIP1", Duration::from_secs(5)).unwrap();
    let requests = server.finish();

    assert_eq!(shipment.status, ShipmentStatus::Ready);
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|request| request.path == "/shipments/SHIP1"));
}

#[test]
fn await_ready_reports_shipment_errors() {
    let body = r#"{"object_id":"SHIP1","status":"ERROR","messages":[{"source":"USPS","text":"bad zip"}]}"#;
    let server = ScriptedServer::start(vec![(200, body.to_string())]);

    let err = provider(&server).await_ready("SHIP1", Duration::from_secs(5)).unwrap_err();
    server.finish();

    match err {
        ProviderError::ShipmentFailed {
            shipment_id,
            message,
        } => {
            assert_eq!(shipment_id, "SHIP1");
            assert_eq!(message, "USPS: bad zip");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// SECTION: Rates
// ============================================================================

#[test]
fn rates_map_service_levels() {
    let body = r#"{"results":[{"object_id":"RATE9","provider":"USPS","amount":"7.58","currency":"USD",
        "servicelevel":{"name":"Ground Advantage","token":"usps_ground_advantage"},"estimated_days":4}]}"#;
    let server = ScriptedServer::start(vec![(200, body.to_string())]);

    let rates = provider(&server).get_rates("SHIP1").unwrap();
    let requests = server.finish();

    assert_eq!(requests[0].path, "/shipments/SHIP1/rates/");
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].id, "RATE9");
    assert_eq!(rates[0].carrier, "USPS");
    assert_eq!(rates[0].service, "Ground Advantage");
    assert_eq!(rates[0].service_level(), "usps_ground_advantage");
    assert_eq!(rates[0].amount, "7.58");
    assert_eq!(rates[0].estimated_days, Some(4));
}

/// Builds a rate page body holding one USPS rate.
fn rate_page(rate_id: &str, next: &str) -> String {
    format!(
        r#"{{"next":{next},"results":[{{"object_id":"{rate_id}","provider":"USPS",
        "amount":"9.10","currency":"USD",
        "servicelevel":{{"name":"Priority","token":"usps_priority"}}}}]}}"#
    )
}

#[test]
fn rate_pages_are_followed_on_the_api_host() {
    let server = ScriptedServer::start(vec![
        (200, rate_page("RATE1", r#""{base_url}/shipments/SHIP1/rates/?page=2""#)),
        (200, rate_page("RATE2", "null")),
    ]);

    let rates = provider(&server).get_rates("SHIP1").unwrap();
    let requests = server.finish();

    let ids: Vec<&str> = rates.iter().map(|rate| rate.id.as_str()).collect();
    assert_eq!(ids, ["RATE1", "RATE2"]);
    assert_eq!(requests[1].path, "/shipments/SHIP1/rates/?page=2");
    assert_eq!(requests[1].authorization.as_deref(), Some("ShippoToken shippo_test_key"));
}

#[test]
fn rate_page_links_to_other_hosts_are_not_followed() {
    let server = ScriptedServer::start(vec![
        (200, rate_page("RATE1", r#""http://attacker.invalid/steal?page=2""#)),
        (200, rate_page("RATE2", "null")),
    ]);

    let rates = provider(&server).get_rates("SHIP1").unwrap();
    let requests = server.finish();

    assert_eq!(rates.len(), 1);
    assert_eq!(requests.len(), 1);
}

#[test]
fn shipment_ids_with_path_characters_send_no_request() {
    let server = ScriptedServer::start(vec![(200, shipment_body("SUCCESS"))]);
    let provider = provider(&server);

    let fetch = provider.get_shipment("x/../../customs/items").unwrap_err();
    let rates = provider.get_rates("../SHIP1").unwrap_err();
    let requests = server.finish();

    assert!(matches!(fetch, ProviderError::InvalidObjectId(_)));
    assert!(matches!(rates, ProviderError::InvalidObjectId(_)));
    assert!(requests.is_empty(), "unexpected requests: {requests:?}");
}

#[test]
fn rejected_requests_surface_provider_detail() {
    let server = ScriptedServer::start(vec![(401, r#"{"detail":"Invalid token."}"#.to_string())]);

    let err = provider(&server).get_shipment("SHIP1").unwrap_err();
    server.finish();

    assert_eq!(err.to_string(), "provider rejected request (401): Invalid token.");
}

#[test]
fn unknown_status_is_an_invalid_response() {
    let server = ScriptedServer::start(vec![(200, shipment_body("PAUSED"))]);

    let err = provider(&server).get_shipment("SHIP1").unwrap_err();
    server.finish();

    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}
