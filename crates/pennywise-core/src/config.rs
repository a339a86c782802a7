//! Application configuration
//!
//! Settings resolve in two layers:
//! 1. An optional TOML file (`--config`, or `<config dir>/pennywise/config.toml`)
//! 2. Built-in defaults for anything the file leaves out
//!
//! Environment variables (`PENNYWISE_*`) are applied on top by the server
//! and CLI, not here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analytics::{AnalyticsConfig, CategoryTotalsMode};
use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub analytics: AnalyticsConfig,
    pub server: ServerSettings,
}

/// `[server]` table
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pennywise").join("config.toml"))
}

impl AppConfig {
    /// Load from an explicit path, or the default location when `None`
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(&p)?;
                tracing::debug!("Loaded config from {}", p.display());
                Self::parse(&content)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse TOML content, filling unspecified values with defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = AppConfig::default();

        if let Some(analytics) = raw.analytics {
            if let Some(months) = analytics.window_months {
                if months == 0 {
                    return Err(Error::Config(
                        "analytics.window_months must be at least 1".to_string(),
                    ));
                }
                config.analytics.window_months = months;
            }
            if let Some(mode) = analytics.category_totals {
                config.analytics.category_totals = mode;
            }
        }

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                config.server.allowed_origins = origins;
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    analytics: Option<RawAnalytics>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnalytics {
    window_months: Option<u32>,
    category_totals: Option<CategoryTotalsMode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}
