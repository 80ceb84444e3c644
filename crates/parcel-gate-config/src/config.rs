// crates/parcel-gate-config/src/config.rs
// ============================================================================
// Module: Parcel Gate Configuration
// Description: Configuration loading, secret resolution, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: parcel-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Secrets may be given inline or named through `*_env` keys, which are read
//! from the process environment at load time. Missing or invalid
//! configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use parcel_gate_core::AllowList;
use parcel_gate_core::ContentsType;
use parcel_gate_core::CountryClassifier;
use parcel_gate_core::CustomsSettings;
use parcel_gate_core::DimensionUnit;
use parcel_gate_core::NonDeliveryOption;
use parcel_gate_core::ParcelTemplate;
use parcel_gate_core::ShipmentAddress;
use parcel_gate_core::ShippingSettings;
use parcel_gate_core::TaxSettings;
use parcel_gate_core::WeightUnit;
use parcel_gate_core::is_eu_country;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "parcel-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PARCEL_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default webhook request-validation endpoint (token is appended).
pub const DEFAULT_VALIDATE_URL: &str = "https://app.snipcart.com/api/requestvalidation/";
/// Default header carrying the webhook request token.
pub const DEFAULT_TOKEN_HEADER: &str = "X-Snipcart-RequestToken";
/// Default Shippo API base URL.
pub const SHIPPO_BASE_URL: &str = "https://api.goshippo.com";
/// Default EasyPost API base URL.
pub const EASYPOST_BASE_URL: &str = "https://api.easypost.com/v2";

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Parcel Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParcelGateConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Checkout platform configuration.
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Rate provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Shipping configuration.
    #[serde(default)]
    pub shipping: ShippingConfig,
    /// Customs configuration.
    #[serde(default)]
    pub customs: CustomsConfig,
    /// Tax configuration.
    #[serde(default)]
    pub tax: TaxConfig,
    /// Checkout validation configuration.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl ParcelGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path comes from `path`, then `PARCEL_GATE_CONFIG`, then
    /// `parcel-gate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, secret resolution, or
    /// validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml(content)?;
        config.resolve_secrets(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without resolving secrets or validating.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid config TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves `*_env` secret references through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a secret is given both inline and
    /// by environment name, or the named variable is unset or blank.
    pub fn resolve_secrets<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        resolve_secret(
            "platform.api_key",
            &mut self.platform.api_key,
            self.platform.api_key_env.as_deref(),
            &lookup,
        )?;
        resolve_secret(
            "provider.api_key",
            &mut self.provider.api_key,
            self.provider.api_key_env.as_deref(),
            &lookup,
        )
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.platform.validate()?;
        self.provider.validate()?;
        self.shipping.validate()?;
        self.customs.validate()?;
        self.tax.validate()?;
        Ok(())
    }

    /// Returns the destination classifier for the configured home country.
    #[must_use]
    pub fn classifier(&self) -> CountryClassifier {
        CountryClassifier::new(self.shipping.home_country.trim().to_ascii_uppercase())
    }

    /// Returns the parsed rate allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an entry is malformed.
    pub fn allow_list(&self) -> Result<AllowList, ConfigError> {
        AllowList::parse(&self.shipping.allowed_services)
            .map_err(|err| ConfigError::Invalid(format!("shipping.allowed_services: {err}")))
    }

    /// Returns the customs settings for the assembler.
    #[must_use]
    pub fn customs_settings(&self) -> CustomsSettings {
        let origin = self
            .customs
            .origin_country
            .as_deref()
            .map_or_else(|| self.shipping.sender.country.clone(), ToString::to_string);
        CustomsSettings {
            certifier: self.customs.certifier.clone(),
            ein: self.customs.ein.clone(),
            ioss: self.customs.ioss.clone(),
            ioss_issuing_country: self.customs.ioss_issuing_country.to_ascii_uppercase(),
            origin_country: origin.to_ascii_uppercase(),
            non_delivery: self.customs.non_delivery,
            contents_type: self.customs.contents_type,
            weight_unit: self.shipping.weight_unit,
        }
    }

    /// Returns the shipping settings for the orchestrator.
    #[must_use]
    pub fn shipping_settings(&self) -> ShippingSettings {
        ShippingSettings {
            sender: self.shipping.sender.clone(),
            parcel: self.shipping.parcel.clone(),
            weight_unit: self.shipping.weight_unit,
            dimension_unit: self.shipping.dimension_unit,
            await_budget: Duration::from_millis(self.provider.await_timeout_ms),
        }
    }

    /// Returns the tax settings for the assessor.
    #[must_use]
    pub fn tax_settings(&self) -> TaxSettings {
        TaxSettings {
            domestic_name: self.tax.domestic_name.clone(),
            domestic_invoice_number: self.tax.domestic_invoice_number.clone(),
            vat_overrides: self
                .tax
                .vat_overrides
                .iter()
                .map(|(code, rate)| (code.trim().to_ascii_uppercase(), *rate))
                .collect(),
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path the checkout platform posts webhooks to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            webhook_path: default_webhook_path(),
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self.bind.trim();
        if bind.is_empty() {
            return Err(ConfigError::Invalid("server.bind must be set".to_string()));
        }
        bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {bind}"))
        })
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if !self.webhook_path.starts_with('/') {
            return Err(ConfigError::Invalid("server.webhook_path must start with '/'".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuditConfig {
    /// Emit one JSON audit line per webhook to stderr.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
        }
    }
}

// ============================================================================
// SECTION: Platform
// ============================================================================

/// Checkout platform configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Request-validation URL; the token is appended.
    #[serde(default = "default_validate_url")]
    pub validate_url: String,
    /// Header carrying the webhook request token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Secret API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the secret API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_platform_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            validate_url: default_validate_url(),
            token_header: default_token_header(),
            api_key: None,
            api_key_env: None,
            timeout_ms: default_platform_timeout_ms(),
        }
    }
}

impl PlatformConfig {
    /// Returns the resolved API key, or an empty string when unset.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Validates platform configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("platform.validate_url", &self.validate_url)?;
        if self.token_header.trim().is_empty() {
            return Err(ConfigError::Invalid("platform.token_header must be set".to_string()));
        }
        require_secret("platform.api_key", self.api_key.as_deref())?;
        require_positive("platform.timeout_ms", self.timeout_ms)
    }
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Supported rate providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Shippo.
    #[default]
    Shippo,
    /// EasyPost.
    EasyPost,
}

impl ProviderKind {
    /// Returns the provider label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shippo => "shippo",
            Self::EasyPost => "easypost",
        }
    }

    /// Returns the provider's production API base URL.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Shippo => SHIPPO_BASE_URL,
            Self::EasyPost => EASYPOST_BASE_URL,
        }
    }
}

/// Rate provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider selection.
    #[serde(default)]
    pub kind: ProviderKind,
    /// Secret API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the secret API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// API base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Budget for waiting on rate computation, in milliseconds.
    #[serde(default = "default_await_timeout_ms")]
    pub await_timeout_ms: u64,
    /// Interval between shipment status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// User agent sent to the provider.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: None,
            api_key_env: None,
            base_url: None,
            timeout_ms: default_provider_timeout_ms(),
            await_timeout_ms: default_await_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProviderConfig {
    /// Returns the resolved API key, or an empty string when unset.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Returns the effective API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        let base_url = self.base_url.as_deref().unwrap_or_else(|| self.kind.default_base_url());
        base_url.trim_end_matches('/')
    }

    /// Validates provider configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        require_secret("provider.api_key", self.api_key.as_deref())?;
        if let Some(base_url) = &self.base_url {
            validate_http_url("provider.base_url", base_url)?;
        }
        require_positive("provider.timeout_ms", self.timeout_ms)?;
        require_positive("provider.await_timeout_ms", self.await_timeout_ms)?;
        require_positive("provider.poll_interval_ms", self.poll_interval_ms)?;
        if self.poll_interval_ms > self.await_timeout_ms {
            return Err(ConfigError::Invalid(
                "provider.poll_interval_ms must not exceed provider.await_timeout_ms".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.user_agent must be set".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Shipping
// ============================================================================

/// Shipping configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingConfig {
    /// ISO code of the sender's home country.
    #[serde(default = "default_home_country")]
    pub home_country: String,
    /// Weight unit for parcels and customs items.
    #[serde(default)]
    pub weight_unit: WeightUnit,
    /// Dimension unit for parcels.
    #[serde(default)]
    pub dimension_unit: DimensionUnit,
    /// Flat discount subtracted from every rate.
    #[serde(default)]
    pub discount: f64,
    /// Carrier / `carrier:service-level` allow-list; empty allows all.
    #[serde(default)]
    pub allowed_services: Vec<String>,
    /// Sender address.
    #[serde(default)]
    pub sender: ShipmentAddress,
    /// Default parcel dimensions.
    #[serde(default)]
    pub parcel: ParcelTemplate,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            home_country: default_home_country(),
            weight_unit: WeightUnit::default(),
            dimension_unit: DimensionUnit::default(),
            discount: 0.0,
            allowed_services: Vec::new(),
            sender: ShipmentAddress::default(),
            parcel: ParcelTemplate::default(),
        }
    }
}

impl ShippingConfig {
    /// Validates shipping configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_country("shipping.home_country", &self.home_country)?;
        validate_country("shipping.sender.country", &self.sender.country)?;
        if !self.discount.is_finite() || self.discount < 0.0 {
            return Err(ConfigError::Invalid(
                "shipping.discount must be a non-negative number".to_string(),
            ));
        }
        for (field, value) in [
            ("shipping.parcel.length", self.parcel.length),
            ("shipping.parcel.width", self.parcel.width),
            ("shipping.parcel.height", self.parcel.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{field} must be positive")));
            }
        }
        AllowList::parse(&self.allowed_services)
            .map_err(|err| ConfigError::Invalid(format!("shipping.allowed_services: {err}")))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Customs
// ============================================================================

/// Customs configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomsConfig {
    /// Person certifying customs declarations.
    #[serde(default)]
    pub certifier: String,
    /// US employer identification number.
    #[serde(default)]
    pub ein: String,
    /// EU import one-stop-shop number.
    #[serde(default)]
    pub ioss: String,
    /// Country that issued the IOSS number.
    #[serde(default = "default_ioss_issuing_country")]
    pub ioss_issuing_country: String,
    /// Country of origin for customs items; defaults to the sender country.
    #[serde(default)]
    pub origin_country: Option<String>,
    /// Policy for undeliverable parcels.
    #[serde(default)]
    pub non_delivery: NonDeliveryOption,
    /// Contents classification.
    #[serde(default)]
    pub contents_type: ContentsType,
}

impl Default for CustomsConfig {
    fn default() -> Self {
        Self {
            certifier: String::new(),
            ein: String::new(),
            ioss: String::new(),
            ioss_issuing_country: default_ioss_issuing_country(),
            origin_country: None,
            non_delivery: NonDeliveryOption::default(),
            contents_type: ContentsType::default(),
        }
    }
}

impl CustomsConfig {
    /// Validates customs configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.certifier.trim().is_empty() {
            return Err(ConfigError::Invalid("customs.certifier must be set".to_string()));
        }
        if self.ioss.trim().is_empty() {
            return Err(ConfigError::Invalid("customs.ioss must be set".to_string()));
        }
        validate_country("customs.ioss_issuing_country", &self.ioss_issuing_country)?;
        if let Some(origin) = &self.origin_country {
            validate_country("customs.origin_country", origin)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tax
// ============================================================================

/// Tax configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Name of the zero-rate domestic line.
    #[serde(default = "default_domestic_name")]
    pub domestic_name: String,
    /// Invoice number of the zero-rate domestic line.
    #[serde(default = "default_domestic_invoice_number")]
    pub domestic_invoice_number: String,
    /// Per-country VAT rate overrides for EU members.
    #[serde(default)]
    pub vat_overrides: BTreeMap<String, f64>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            domestic_name: default_domestic_name(),
            domestic_invoice_number: default_domestic_invoice_number(),
            vat_overrides: BTreeMap::new(),
        }
    }
}

impl TaxConfig {
    /// Validates tax configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.domestic_name.trim().is_empty() {
            return Err(ConfigError::Invalid("tax.domestic_name must be set".to_string()));
        }
        if self.domestic_invoice_number.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tax.domestic_invoice_number must be set".to_string(),
            ));
        }
        for (code, rate) in &self.vat_overrides {
            if !is_eu_country(code) {
                return Err(ConfigError::Invalid(format!(
                    "tax.vat_overrides.{code} is not an EU member state"
                )));
            }
            if !(0.0 .. 1.0).contains(rate) {
                return Err(ConfigError::Invalid(format!(
                    "tax.vat_overrides.{code} must be within [0, 1)"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Checkout
// ============================================================================

/// Checkout validation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutConfig {
    /// Reject recipient names carriers refuse before quoting rates.
    #[serde(default)]
    pub validate_recipient_name: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never contain secret values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading config.
    #[error("config io error: {0}")]
    Io(String),
    /// Parse error while reading config.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Fills `value` from the environment variable named by `env_name`.
fn resolve_secret<F>(
    field: &str,
    value: &mut Option<String>,
    env_name: Option<&str>,
    lookup: &F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(env_name) = env_name else {
        return Ok(());
    };
    if value.is_some() {
        return Err(ConfigError::Invalid(format!(
            "{field} and {field}_env are mutually exclusive"
        )));
    }
    let secret = lookup(env_name.trim())
        .filter(|secret| !secret.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::Invalid(format!("{field}_env names unset variable {env_name}"))
        })?;
    *value = Some(secret);
    Ok(())
}

/// Requires a resolved, non-blank secret.
fn require_secret(field: &str, value: Option<&str>) -> Result<(), ConfigError> {
    if value.is_none_or(|secret| secret.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!("{field} or {field}_env must be set")));
    }
    Ok(())
}

/// Requires a positive millisecond value.
fn require_positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    Ok(())
}

/// Requires an `http://` or `https://` URL.
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ConfigError::Invalid(format!("{field} must include http:// or https://")));
    }
    Ok(())
}

/// Requires a two-letter ASCII country code.
fn validate_country(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ConfigError::Invalid(format!("{field} must be a two-letter country code")));
    }
    Ok(())
}

/// Default bind address.
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Default webhook path.
fn default_webhook_path() -> String {
    "/webhooks/snipcart".to_string()
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Serde default helper for `true`.
const fn default_true() -> bool {
    true
}

/// Default request-validation URL.
fn default_validate_url() -> String {
    DEFAULT_VALIDATE_URL.to_string()
}

/// Default token header.
fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

/// Default platform request timeout.
const fn default_platform_timeout_ms() -> u64 {
    5_000
}

/// Default provider request timeout.
const fn default_provider_timeout_ms() -> u64 {
    10_000
}

/// Default wait budget for rate computation.
const fn default_await_timeout_ms() -> u64 {
    10_000
}

/// Default shipment status poll interval.
const fn default_poll_interval_ms() -> u64 {
    500
}

/// Default provider user agent.
fn default_user_agent() -> String {
    format!("parcel-gate/{}", env!("CARGO_PKG_VERSION"))
}

/// Default home country.
fn default_home_country() -> String {
    parcel_gate_core::DEFAULT_HOME_COUNTRY.to_string()
}

/// Default IOSS issuing country.
fn default_ioss_issuing_country() -> String {
    parcel_gate_core::customs::DEFAULT_IOSS_ISSUING_COUNTRY.to_string()
}

/// Default domestic tax line name.
fn default_domestic_name() -> String {
    parcel_gate_core::tax::DEFAULT_DOMESTIC_TAX_NAME.to_string()
}

/// Default domestic tax invoice number.
fn default_domestic_invoice_number() -> String {
    parcel_gate_core::tax::DEFAULT_DOMESTIC_INVOICE_NUMBER.to_string()
}
