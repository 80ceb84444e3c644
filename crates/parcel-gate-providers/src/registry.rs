// crates/parcel-gate-providers/src/registry.rs
// ============================================================================
// Module: Provider Registry
// Description: Builds configured provider and validator instances.
// Purpose: Keep provider selection in one place, driven by configuration.
// Dependencies: parcel-gate-config, parcel-gate-core, tracing
// ============================================================================

//! ## Overview
//! The registry turns validated configuration into trait objects. Exactly one
//! rate provider is active per process, chosen by `provider.kind`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use parcel_gate_config::PlatformConfig;
use parcel_gate_config::ProviderConfig;
use parcel_gate_config::ProviderKind;
use parcel_gate_core::ProviderError;
use parcel_gate_core::RateProvider;
use parcel_gate_core::RequestValidator;
use tracing::info;

use crate::easypost::EasyPostProvider;
use crate::http::ApiClient;
use crate::http::Auth;
use crate::http::HttpSettings;
use crate::platform::PlatformValidator;
use crate::poll::PollSettings;
use crate::shippo::ShippoProvider;

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the configured rate provider.
///
/// # Errors
///
/// Returns [`ProviderError::Transport`] when the HTTP client cannot be built.
pub fn build_rate_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn RateProvider>, ProviderError> {
    let settings = HttpSettings {
        timeout_ms: config.timeout_ms,
        user_agent: config.user_agent.clone(),
        ..HttpSettings::default()
    };
    let poll = PollSettings::from_millis(config.poll_interval_ms);
    let base_url = config.base_url();
    info!(provider = config.kind.as_str(), base_url, "rate provider configured");
    let provider: Arc<dyn RateProvider> = match config.kind {
        ProviderKind::Shippo => {
            let auth = Auth::ShippoToken(config.api_key().to_string());
            Arc::new(ShippoProvider::new(ApiClient::new(base_url, auth, &settings)?, poll))
        }
        ProviderKind::EasyPost => {
            let auth = Auth::BasicKey(config.api_key().to_string());
            Arc::new(EasyPostProvider::new(ApiClient::new(base_url, auth, &settings)?, poll))
        }
    };
    Ok(provider)
}

/// Builds the checkout platform's request validator.
///
/// # Errors
///
/// Returns [`ProviderError::Transport`] when the HTTP client cannot be built.
pub fn build_request_validator(
    config: &PlatformConfig,
    user_agent: &str,
) -> Result<Arc<dyn RequestValidator>, ProviderError> {
    let settings = HttpSettings {
        timeout_ms: config.timeout_ms,
        user_agent: user_agent.to_string(),
        ..HttpSettings::default()
    };
    let validator = PlatformValidator::new(&config.validate_url, config.api_key(), &settings)?;
    Ok(Arc::new(validator))
}
