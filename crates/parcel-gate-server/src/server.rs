// crates/parcel-gate-server/src/server.rs
// ============================================================================
// Module: Webhook Server
// Description: HTTP transport for checkout webhooks.
// Purpose: Bind the configured address and hand requests to the router.
// Dependencies: axum, tokio, parcel-gate-config, parcel-gate-providers
// ============================================================================

//! ## Overview
//! [`WebhookServer`] wires configuration into a [`WebhookRouter`] and serves
//! it over HTTP with axum. The router blocks on provider calls, so each
//! request runs on tokio's blocking pool via `spawn_blocking`.
//! Construction must happen outside a tokio runtime: the blocking provider
//! clients own runtimes of their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use parcel_gate_config::ParcelGateConfig;
use parcel_gate_core::CustomsAssembler;
use parcel_gate_core::RateFormatter;
use parcel_gate_core::ShipmentOrchestrator;
use parcel_gate_core::TaxAssessor;
use parcel_gate_providers::build_rate_provider;
use parcel_gate_providers::build_request_validator;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::audit::AuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::router::ReplyBody;
use crate::router::WebhookReply;
use crate::router::WebhookRouter;
use crate::router::WebhookRouterParts;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Webhook HTTP server.
pub struct WebhookServer {
    /// Listen address.
    bind: SocketAddr,
    /// Route settings and router.
    state: Arc<ServerState>,
}

/// Shared state for the webhook handler.
struct ServerState {
    /// Webhook route path.
    webhook_path: String,
    /// Header carrying the request token.
    token_header: String,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Webhook router.
    router: Arc<WebhookRouter>,
}

impl WebhookServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when configuration is invalid and
    /// [`ServerError::Init`] when a provider client cannot be built.
    pub fn from_config(config: &ParcelGateConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let provider = build_rate_provider(&config.provider)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let validator = build_request_validator(&config.platform, &config.provider.user_agent)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let allow_list = config.allow_list().map_err(|err| ServerError::Config(err.to_string()))?;
        let orchestrator = ShipmentOrchestrator::new(
            provider,
            CustomsAssembler::new(config.customs_settings(), config.classifier()),
            RateFormatter::new(allow_list, config.shipping.discount),
            config.shipping_settings(),
        );
        let audit: Arc<dyn AuditSink> = if config.server.audit.enabled {
            Arc::new(StderrAuditSink)
        } else {
            Arc::new(NoopAuditSink)
        };
        let router = WebhookRouter::new(WebhookRouterParts {
            validator,
            orchestrator,
            tax: TaxAssessor::new(config.tax_settings()),
            validate_recipient_name: config.checkout.validate_recipient_name,
            max_body_bytes: config.server.max_body_bytes,
            audit,
        });
        Ok(Self::new(bind, config, router))
    }

    /// Builds a server around an existing router.
    #[must_use]
    pub fn new(bind: SocketAddr, config: &ParcelGateConfig, router: WebhookRouter) -> Self {
        Self {
            bind,
            state: Arc::new(ServerState {
                webhook_path: config.server.webhook_path.clone(),
                token_header: config.platform.token_header.clone(),
                max_body_bytes: config.server.max_body_bytes,
                router: Arc::new(router),
            }),
        }
    }

    /// Returns the configured listen address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Binds the configured address and serves until the server fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_on(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when serving fails.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, path = %self.state.webhook_path, "webhook server listening");
        }
        axum::serve(listener, self.app())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }

    /// Builds the axum application.
    fn app(&self) -> Router {
        // One byte of headroom lets the router answer oversized bodies itself.
        let limit = self.state.max_body_bytes.saturating_add(1);
        Router::new()
            .route(&self.state.webhook_path, post(handle_webhook))
            .layer(DefaultBodyLimit::max(limit))
            .with_state(Arc::clone(&self.state))
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles a webhook POST on the blocking pool.
async fn handle_webhook(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = headers
        .get(state.token_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let router = Arc::clone(&state.router);
    let reply =
        tokio::task::spawn_blocking(move || router.handle(token.as_deref(), &body)).await;
    match reply {
        Ok(reply) => reply.into_response(),
        Err(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "webhook handler failed").into_response()
        }
    }
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(bytes) => {
                (self.status, [(CONTENT_TYPE, "application/json")], bytes).into_response()
            }
            ReplyBody::Text(text) => {
                (self.status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
            }
            ReplyBody::Empty => self.status.into_response(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Webhook server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
