//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Rate limit policies.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Reporter IP geolocation configuration.
    #[serde(default)]
    pub geoip: GeoIpConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment ("development", "production", ...).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServerConfig {
    /// Whether this instance runs in production mode.
    ///
    /// Production mode withholds the raw risk score from check responses.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Secret salt mixed into phone-number hashes.
    ///
    /// Loaded once at startup. Rotating it invalidates every stored
    /// lookup key, which is an accepted operational tradeoff.
    pub phone_salt: String,
}

/// Fixed-window rate limit policies for the two endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Max check requests per window per IP.
    #[serde(default = "default_check_max")]
    pub check_max_requests: u32,
    /// Check window duration in seconds.
    #[serde(default = "default_window_secs")]
    pub check_window_secs: u64,
    /// Max report submissions per window per IP.
    #[serde(default = "default_report_max")]
    pub report_max_requests: u32,
    /// Report window duration in seconds.
    #[serde(default = "default_window_secs")]
    pub report_window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            check_max_requests: default_check_max(),
            check_window_secs: default_window_secs(),
            report_max_requests: default_report_max(),
            report_window_secs: default_window_secs(),
        }
    }
}

/// Reporter IP geolocation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoIpConfig {
    /// Whether to look up coarse reporter location at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-request timeout for lookup services, in seconds.
    #[serde(default = "default_geoip_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timeout_secs: default_geoip_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_check_max() -> u32 {
    100
}

const fn default_report_max() -> u32 {
    3
}

const fn default_window_secs() -> u64 {
    3600
}

const fn default_geoip_timeout() -> u64 {
    5
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `DZRETOUR_ENV`)
    /// 3. Environment variables with `DZRETOUR_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("DZRETOUR_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DZRETOUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("DZRETOUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
