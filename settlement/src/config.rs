//! Configuration for settlement engine

use crate::{proxy::parse_proxy_spec, types::ProxyGroup};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Results document to settle
    pub input_path: Option<PathBuf>,

    /// Proxy spec, e.g. `alice,bob;carol,dave`
    pub proxies: Option<String>,

    /// Report configuration
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settle-up".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            input_path: None,
            proxies: None,
            report: ReportConfig::default(),
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Symbol printed before amounts
    pub currency_symbol: String,

    /// List the games covered by the settlement
    pub show_games: bool,

    /// List proxy consolidations
    pub show_proxies: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            show_games: false,
            show_proxies: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env();
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("SETTLE_UP_INPUT") {
            self.input_path = Some(PathBuf::from(path));
        }

        if let Ok(proxies) = std::env::var("SETTLE_UP_PROXIES") {
            self.proxies = Some(proxies);
        }

        if let Ok(symbol) = std::env::var("SETTLE_UP_CURRENCY_SYMBOL") {
            self.report.currency_symbol = symbol;
        }
    }

    /// Parsed proxy groups (empty when no proxies are configured)
    pub fn proxy_groups(&self) -> crate::Result<Vec<ProxyGroup>> {
        match &self.proxies {
            Some(spec) => parse_proxy_spec(spec),
            None => Ok(Vec::new()),
        }
    }
}
