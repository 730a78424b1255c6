// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tonearm_extractor::{SoundCloudPluginOptions, DEFAULT_SEARCH_LIMIT};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundCloudConfig {
    pub client_id: Option<String>,
    pub oauth_token: Option<String>,
    /// Overrides the public API v2 endpoint.
    pub api_base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SoundCloudConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            oauth_token: None,
            api_base_url: None,
            timeout_secs: 30,
        }
    }
}

impl SoundCloudConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub soundcloud: SoundCloudConfig,
    pub search: SearchConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Credentials in the shape the plugin accepts.
    pub fn plugin_options(&self) -> SoundCloudPluginOptions {
        SoundCloudPluginOptions {
            client_id: self.soundcloud.client_id.clone(),
            oauth_token: self.soundcloud.oauth_token.clone(),
        }
    }
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: TONEARM_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("TONEARM_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(
        target: "config",
        client_id_configured = config.soundcloud.client_id.is_some(),
        oauth_configured = config.soundcloud.oauth_token.is_some(),
        "configuration loaded"
    );
    Ok(config)
}
