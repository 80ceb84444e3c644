// crates/parcel-gate-config/src/lib.rs
// ============================================================================
// Module: Parcel Gate Config Library
// Description: Canonical config model, secret resolution, and validation.
// Purpose: Single source of truth for parcel-gate.toml semantics.
// Dependencies: parcel-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `parcel-gate-config` defines the configuration model for Parcel Gate. It
//! loads a TOML file with hard size limits, resolves secrets from the
//! environment, and validates fail-closed before anything is started. The
//! validated model converts into the explicit settings structs consumed by
//! `parcel-gate-core`.
//!
//! Security posture: config inputs are untrusted and secrets are never
//! echoed in error messages.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
