//! Configuration module for Cyberfort Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reputation: ReputationConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Remote reputation services and fallback policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// Timeout applied to every outbound request.
    pub timeout_secs: u64,
    /// Fall back to the local heuristic when a service is unconfigured or fails.
    pub heuristic_fallback: bool,
    /// Seed for the heuristic random draws. Unset draws from the thread RNG.
    pub heuristic_seed: Option<u64>,
    pub virustotal: RemoteServiceConfig,
    pub abstractapi: RemoteServiceConfig,
}

/// Access settings for one remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteServiceConfig {
    /// Empty means the service is not configured.
    #[serde(default)]
    pub api_key: String,
    /// Empty selects the service's public endpoint.
    #[serde(default)]
    pub base_url: String,
}

impl RemoteServiceConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// History query settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of records returned by history queries.
    pub limit: u32,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. VIRUSTOTAL_API_KEY, ABSTRACTAPI_API_KEY and PORT
    /// 2. Environment variables (CYBERFORT__*)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    pub fn load() -> Result<Self, ConfigError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<i64>().ok());

        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with CYBERFORT__ prefix
            .add_source(
                Environment::with_prefix("CYBERFORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "reputation.virustotal.api_key",
                std::env::var("VIRUSTOTAL_API_KEY").ok(),
            )?
            .set_override_option(
                "reputation.abstractapi.api_key",
                std::env::var("ABSTRACTAPI_API_KEY").ok(),
            )?
            .set_override_option("server.port", port)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:cyberfort.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            heuristic_fallback: true,
            heuristic_seed: None,
            virustotal: RemoteServiceConfig {
                api_key: String::new(),
                base_url: "https://www.virustotal.com/api/v3".to_string(),
            },
            abstractapi: RemoteServiceConfig {
                api_key: String::new(),
                base_url: "https://phonevalidation.abstractapi.com/v1".to_string(),
            },
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}
