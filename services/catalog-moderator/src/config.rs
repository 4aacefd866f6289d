//! Configuration types for the catalog moderator

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::host::HostContext;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the admin API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Identity supplied by the embedding host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub embedded: bool,
}

impl HostConfig {
    pub fn context(&self) -> HostContext {
        HostContext::new(self.operator_id.clone(), self.embedded)
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default = "default_notice_history_size")]
    pub notice_history_size: usize,
    /// Surface failed stats fetches to the operator instead of only logging them
    #[serde(default)]
    pub show_stats_failures: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_dashboard_port(),
            notice_history_size: default_notice_history_size(),
            show_stats_failures: false,
        }
    }
}

fn default_base_url() -> String {
    "https://nebula-server-ypun.onrender.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_dashboard_port() -> u16 {
    11120
}

fn default_notice_history_size() -> usize {
    50
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::ModeratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.backend.base_url.trim().is_empty() {
        return Err(crate::ModeratorError::Config(
            "backend.base_url must not be empty".to_string(),
        ));
    }
    Ok(config)
}
