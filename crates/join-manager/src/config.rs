//! Manager configuration loaded from a TOML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use join_core::ids::deserialize_id_list;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Written to disk when no configuration file exists yet.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Join manager configuration.

# Background image (inside the assets directory) for charts. Charts show
# the slices only; the category names are not drawn.
bg_img = "bg.png"
# Seconds to wait between two notice messages.
delay = 0.5
# Seconds to wait after approving before the welcome notice is sent.
debounce = 2.0

[divide_group]
# "blacklist": handle every group except those in control_list.
# "whitelist": handle only the groups in control_list.
block_method = "blacklist"
control_list = []

# "category:keyword1,keyword2"; categories are checked in order.
accept_categories = []

# A comment containing any of these is rejected.
reject = []

# "group_id:template" or "default:template".
# Placeholders: %group_id% %user_id% %user_name% %key%
reject_reason = ["default:自动拒绝: 命中关键词【%key%】"]

# "group_id:message" or "default:message".
welcome_msg = ["default:欢迎新成员！通过自动审核"]

# Groups that never get a source chart.
disabled_statistics = []

# Sessions notified about approvals and rejections. "origin" is the group
# the request came from.
accept_notice = ["origin"]
reject_notice = ["origin"]
"#;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or create the configuration file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level manager configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinManagerConfig {
    /// Background image file name for the chart renderer.
    #[serde(default = "default_bg_img")]
    pub bg_img: String,

    /// Seconds between consecutive notice sends.
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Seconds to wait before sending the accept notice.
    #[serde(default = "default_debounce")]
    pub debounce: f64,

    /// Join request handling rules.
    #[serde(default)]
    pub divide_group: DivideGroupConfig,
}

/// Rules for handling join requests.
#[derive(Debug, Clone, Deserialize)]
pub struct DivideGroupConfig {
    /// `blacklist` (default) or `whitelist`.
    #[serde(default = "default_block_method")]
    pub block_method: String,

    /// Group ids the block method applies to.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub control_list: Vec<String>,

    /// Raw `category:kw,kw` entries.
    #[serde(default)]
    pub accept_categories: Vec<String>,

    /// Reject keywords.
    #[serde(default)]
    pub reject: Vec<String>,

    /// Raw `group_id:template` entries.
    #[serde(default)]
    pub reject_reason: Vec<String>,

    /// Raw `group_id:message` entries.
    #[serde(default = "default_welcome_msg")]
    pub welcome_msg: Vec<String>,

    /// Groups for which no chart is rendered.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub disabled_statistics: Vec<String>,

    /// Sessions notified of approvals.
    #[serde(default = "default_notice")]
    pub accept_notice: Vec<String>,

    /// Sessions notified of rejections.
    #[serde(default = "default_notice")]
    pub reject_notice: Vec<String>,
}

fn default_bg_img() -> String {
    "bg.png".to_string()
}

fn default_delay() -> f64 {
    0.5
}

fn default_debounce() -> f64 {
    2.0
}

fn default_block_method() -> String {
    "blacklist".to_string()
}

fn default_welcome_msg() -> Vec<String> {
    vec!["default:欢迎新成员！通过自动审核".to_string()]
}

fn default_notice() -> Vec<String> {
    vec!["origin".to_string()]
}

impl Default for JoinManagerConfig {
    fn default() -> Self {
        Self {
            bg_img: default_bg_img(),
            delay: default_delay(),
            debounce: default_debounce(),
            divide_group: DivideGroupConfig::default(),
        }
    }
}

impl Default for DivideGroupConfig {
    fn default() -> Self {
        Self {
            block_method: default_block_method(),
            control_list: Vec::new(),
            accept_categories: Vec::new(),
            reject: Vec::new(),
            reject_reason: Vec::new(),
            welcome_msg: default_welcome_msg(),
            disabled_statistics: Vec::new(),
            accept_notice: default_notice(),
            reject_notice: default_notice(),
        }
    }
}

impl JoinManagerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from `path`, creating it from
    /// [`DEFAULT_CONFIG_TEMPLATE`] first if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
            info!(path = %path.display(), "config file not found, wrote defaults");
        }

        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Pause between two notice sends.
    pub fn send_interval(&self) -> Duration {
        seconds(self.delay)
    }

    /// Pause before the accept notice goes out.
    pub fn debounce_interval(&self) -> Duration {
        seconds(self.debounce)
    }
}

/// Negative, NaN and out-of-range values become zero.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or_default()
}
