//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `NOOKDEX_CONFIG`
//! environment variable. A missing file is not an error: every field has a default, and the
//! remaining required values can come from the environment.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `NOOKDEX_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database_url` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `NOOKDEX_CATALOG__API_KEY=...` sets the `catalog.api_key` field.
//!
//! ## Example
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 3001
//! database_url: postgres://localhost/nookdex
//! catalog:
//!   base_url: https://api.nookipedia.com
//!   accept_version: 1.0.0
//!   request_timeout: 30s
//! cors_allowed_origins:
//!   - http://localhost:5173
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "NOOKDEX_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// PostgreSQL connection string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections
    pub max_connections: u32,
    /// Upstream reference catalog
    pub catalog: CatalogConfig,
    /// Origins allowed to make cross-origin requests. Empty disables the CORS layer.
    pub cors_allowed_origins: Vec<String>,
    /// Export traces over OTLP (configured through the standard `OTEL_*` variables)
    pub enable_otel_export: bool,
}

/// Connection settings for the upstream catalog API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub base_url: Url,
    /// Sent as the `X-API-KEY` header
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Sent as the `Accept-Version` header
    pub accept_version: String,
    /// Upper bound for a single upstream request. Unset means the client default (no timeout).
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api.nookipedia.com").expect("static URL is valid"),
            api_key: String::new(),
            accept_version: "1.0.0".to_string(),
            request_timeout: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: None,
            max_connections: 10,
            catalog: CatalogConfig::default(),
            cors_allowed_origins: Vec::new(),
            enable_otel_export: false,
        }
    }
}

impl Config {
    /// Load configuration from the file named in `args`, then the environment.
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // NOOKDEX_CONFIG names the file itself, it is not a config value
            .merge(Env::prefixed("NOOKDEX_").ignore(&["config"]).split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.database_url.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Internal {
                operation: "validate config: database_url is not configured. \
                            Set DATABASE_URL or NOOKDEX_DATABASE_URL."
                    .to_string(),
            });
        }

        if self.catalog.api_key.trim().is_empty() {
            return Err(Error::Internal {
                operation: "validate config: catalog.api_key is not configured. \
                            Set NOOKDEX_CATALOG__API_KEY."
                    .to_string(),
            });
        }

        if self.max_connections == 0 {
            return Err(Error::Internal {
                operation: "validate config: max_connections must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
