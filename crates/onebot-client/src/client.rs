//! OneBot v11 HTTP API client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::OneBotConfig;
use crate::error::OneBotError;
use crate::types::{
    ActionResponse, GetStrangerInfoParams, IdParam, Segment, SendGroupMsgParams,
    SendPrivateMsgParams, SetGroupAddRequestParams, StatusInfo, StrangerInfo,
};

/// Client for calling actions on a OneBot implementation.
#[derive(Clone)]
pub struct OneBotClient {
    http: Client,
    config: OneBotConfig,
    connected: Arc<AtomicBool>,
}

impl OneBotClient {
    /// Create a client without contacting the API.
    pub fn new(config: OneBotConfig) -> Result<Self, OneBotError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(OneBotError::Http)?;

        Ok(Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a client and verify the API answers `get_status`.
    pub async fn connect(config: OneBotConfig) -> Result<Self, OneBotError> {
        let client = Self::new(config)?;

        if client.health_check().await? {
            info!("Connected to OneBot API at {}", client.config.base_url);
        } else {
            return Err(OneBotError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Check if the last health check succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Call `get_status`; true when the bot reports itself usable.
    pub async fn health_check(&self) -> Result<bool, OneBotError> {
        let result = self
            .call_action::<_, Option<StatusInfo>>("get_status", &json!({}))
            .await;

        match result {
            Ok(status) => {
                // Some implementations answer with empty data.
                let ok = status.map_or(true, |s| s.online.unwrap_or(s.good));
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Approve or reject a group add request.
    pub async fn set_group_add_request(
        &self,
        flag: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), OneBotError> {
        let params = SetGroupAddRequestParams::new(flag, approve, reason);
        let _: Value = self.call_action("set_group_add_request", &params).await?;
        Ok(())
    }

    /// Send a message to a group; returns the message id when reported.
    pub async fn send_group_msg(
        &self,
        group_id: &str,
        message: Vec<Segment>,
    ) -> Result<Option<i64>, OneBotError> {
        let params = SendGroupMsgParams {
            group_id: IdParam::from(group_id),
            message,
        };
        let data: Value = self.call_action("send_group_msg", &params).await?;
        Ok(data.get("message_id").and_then(Value::as_i64))
    }

    /// Send a message to a user; returns the message id when reported.
    pub async fn send_private_msg(
        &self,
        user_id: &str,
        message: Vec<Segment>,
    ) -> Result<Option<i64>, OneBotError> {
        let params = SendPrivateMsgParams {
            user_id: IdParam::from(user_id),
            message,
        };
        let data: Value = self.call_action("send_private_msg", &params).await?;
        Ok(data.get("message_id").and_then(Value::as_i64))
    }

    /// Look up a user's public profile.
    pub async fn get_stranger_info(&self, user_id: &str) -> Result<StrangerInfo, OneBotError> {
        let params = GetStrangerInfoParams {
            user_id: IdParam::from(user_id),
            no_cache: false,
        };
        self.call_action("get_stranger_info", &params).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &OneBotConfig {
        &self.config
    }

    /// Call an action and decode its `data`.
    pub async fn call_action<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        action: &str,
        params: &P,
    ) -> Result<R, OneBotError> {
        let url = self.config.action_url(action);
        debug!("Calling action {}", action);

        let mut request = self.http.post(&url).json(params);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(OneBotError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OneBotError::Connection(format!("HTTP {}: {}", status, body)));
        }

        let reply: ActionResponse = response.json().await.map_err(OneBotError::Http)?;
        if !reply.is_ok() {
            return Err(OneBotError::Action {
                action: action.to_string(),
                retcode: reply.retcode,
                message: reply.error_message(),
            });
        }

        Ok(serde_json::from_value(reply.data.unwrap_or(Value::Null))?)
    }
}

impl std::fmt::Debug for OneBotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneBotClient")
            .field("base_url", &self.config.base_url)
            .field("connected", &self.is_connected())
            .finish()
    }
}
