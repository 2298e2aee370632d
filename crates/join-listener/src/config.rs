//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ListenerError;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8790";
pub const DEFAULT_ONEBOT_API_URL: &str = "http://127.0.0.1:5700";
pub const DEFAULT_CONFIG_PATH: &str = "join_manager.toml";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// File name of the record ledger inside the data directory.
pub const RECORDS_FILE: &str = "join_records.json";

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Address the webhook server binds to (`JOIN_LISTEN_ADDR`).
    pub listen_addr: SocketAddr,
    /// OneBot HTTP API base URL (`ONEBOT_API_URL`).
    pub onebot_api_url: String,
    /// Bearer token for outbound API calls and the admin routes
    /// (`ONEBOT_ACCESS_TOKEN`).
    pub access_token: Option<String>,
    /// Secret the OneBot implementation signs event posts with
    /// (`ONEBOT_SECRET`).
    pub event_secret: Option<String>,
    /// Manager configuration file (`JOIN_MANAGER_CONFIG`).
    pub config_path: PathBuf,
    /// Directory for records and rendered charts (`JOIN_MANAGER_DATA_DIR`).
    pub data_dir: PathBuf,
    /// Directory holding the chart background (`JOIN_ASSETS_DIR`).
    pub assets_dir: PathBuf,
    /// Emit JSON log lines (`JOIN_LOG_JSON`).
    pub log_json: bool,
}

impl ListenerConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ListenerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through a lookup function; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ListenerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let listen_addr =
            get("JOIN_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr.parse().map_err(|_| {
            ListenerError::Config(format!("invalid JOIN_LISTEN_ADDR: {}", listen_addr))
        })?;

        let log_json = get("JOIN_LOG_JSON")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            onebot_api_url: get("ONEBOT_API_URL")
                .unwrap_or_else(|| DEFAULT_ONEBOT_API_URL.to_string()),
            access_token: get("ONEBOT_ACCESS_TOKEN"),
            event_secret: get("ONEBOT_SECRET"),
            config_path: get("JOIN_MANAGER_CONFIG")
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
                .into(),
            data_dir: get("JOIN_MANAGER_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            assets_dir: get("JOIN_ASSETS_DIR")
                .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string())
                .into(),
            log_json,
        })
    }

    /// Path of the record ledger.
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(RECORDS_FILE)
    }

    /// Directory rendered charts are written to.
    pub fn chart_dir(&self) -> PathBuf {
        self.data_dir.join("charts")
    }
}
