// crates/parcel-gate-server/src/lib.rs
// ============================================================================
// Module: Parcel Gate Server
// Description: Webhook router, HTTP transport, and audit sinks.
// Purpose: Answer checkout webhooks with rates, taxes, or acknowledgements.
// Dependencies: axum, tokio, parcel-gate-core, parcel-gate-providers
// ============================================================================

//! ## Overview
//! The server authenticates each webhook with the checkout platform, decodes
//! its envelope, and dispatches rate and tax events to the core pipeline.
//! Security posture: webhook bodies are untrusted; authentication precedes
//! decoding and all failures fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod router;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::WebhookAuditEvent;
pub use audit::WebhookOutcome;
pub use router::ReplyBody;
pub use router::WebhookReply;
pub use router::WebhookRouter;
pub use router::WebhookRouterParts;
pub use server::ServerError;
pub use server::WebhookServer;
