//! Configuration types for onebot-client.

/// Configuration for connecting to a OneBot v11 HTTP API.
#[derive(Debug, Clone)]
pub struct OneBotConfig {
    /// Base URL of the HTTP API (e.g., "http://127.0.0.1:5700").
    pub base_url: String,
    /// Access token sent as a bearer token, if the implementation requires one.
    pub access_token: Option<String>,
}

impl OneBotConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Create configuration with an access token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    /// Get the endpoint URL of an action.
    pub fn action_url(&self, action: &str) -> String {
        format!("{}/{}", self.base_url, action)
    }
}

impl Default for OneBotConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5700")
    }
}
