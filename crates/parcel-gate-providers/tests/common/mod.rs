// crates/parcel-gate-providers/tests/common/mod.rs
// ============================================================================
// Module: Provider Test Helpers
// Description: Scripted tiny_http server and shipment fixtures.
// Purpose: Exercise provider bindings against canned API answers.
// ============================================================================

//! Shared helpers for `parcel-gate-providers` integration tests.

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers panic on server setup failures."
)]

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use parcel_gate_core::DimensionUnit;
use parcel_gate_core::Parcel;
use parcel_gate_core::ParcelTemplate;
use parcel_gate_core::ShipmentAddress;
use parcel_gate_core::ShipmentCustoms;
use parcel_gate_core::ShipmentRequest;
use parcel_gate_core::TaxIdKind;
use parcel_gate_core::TaxIdentifier;
use parcel_gate_core::WeightUnit;
use parcel_gate_providers::ApiClient;
use parcel_gate_providers::Auth;
use parcel_gate_providers::HttpSettings;
use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// How long the scripted server waits for each expected request.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A request observed by the scripted server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub path: String,
    /// `Authorization` header value.
    pub authorization: Option<String>,
    /// `Accept` header value.
    pub accept: Option<String>,
    /// Raw request body.
    pub body: String,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Server answering each request with the next scripted response.
pub struct ScriptedServer {
    /// Base URL of the server.
    pub base_url: String,
    /// Server thread returning the recorded requests.
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl ScriptedServer {
    /// Starts a server that answers `responses` in order, then stops.
    ///
    /// `{base_url}` in a response body is replaced with the server's own URL.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let base_url = format!("http://{addr}");
        let responses: Vec<(u16, String)> = responses
            .into_iter()
            .map(|(status, body)| (status, body.replace("{base_url}", &base_url)))
            .collect();
        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let Ok(Some(mut request)) = server.recv_timeout(RECV_TIMEOUT) else {
                    break;
                };
                let mut request_body = String::new();
                let _ = request.as_reader().read_to_string(&mut request_body);
                recorded.push(RecordedRequest {
                    method: request.method().as_str().to_string(),
                    path: request.url().to_string(),
                    authorization: header(&request, "Authorization"),
                    accept: header(&request, "Accept"),
                    body: request_body,
                });
                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response =
                    Response::from_string(body).with_status_code(status).with_header(content_type);
                let _ = request.respond(response);
            }
            recorded
        });
        Self {
            base_url,
            handle,
        }
    }

    /// Waits for the server thread and returns the recorded requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap()
    }
}

/// Returns a request header value.
fn header(request: &tiny_http::Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}

/// Builds an API client for the scripted server.
pub fn client(server: &ScriptedServer, auth: Auth) -> ApiClient {
    ApiClient::new(&server.base_url, auth, &HttpSettings::default()).unwrap()
}

/// Builds a shipment request, optionally carrying customs.
pub fn shipment_request(customs: Option<ShipmentCustoms>) -> ShipmentRequest {
    ShipmentRequest {
        from: ShipmentAddress {
            name: "Sam Sender".to_string(),
            street1: "9 Dock Rd".to_string(),
            city: "Portsmouth".to_string(),
            state: "NH".to_string(),
            postal_code: "03801".to_string(),
            country: "US".to_string(),
            ..ShipmentAddress::default()
        },
        to: ShipmentAddress {
            name: "Jane Doe".to_string(),
            street1: "Hauptstr. 1".to_string(),
            city: "Berlin".to_string(),
            postal_code: "10115".to_string(),
            country: "DE".to_string(),
            email: "jane@example.com".to_string(),
            ..ShipmentAddress::default()
        },
        parcel: Parcel::from_template(
            &ParcelTemplate::default(),
            1.0,
            WeightUnit::Lb,
            DimensionUnit::Cm,
        ),
        customs,
    }
}

/// Builds customs references carrying an IOSS identifier.
pub fn ioss_customs() -> ShipmentCustoms {
    ShipmentCustoms {
        declaration_id: "DECL-1".to_string(),
        exporter_tax_id: TaxIdentifier {
            kind: TaxIdKind::Ioss,
            number: "IM7240000001".to_string(),
            issuing_country: "ES".to_string(),
        },
    }
}
