//! Slack Web API client.
//!
//! Slack wraps every response as `{ ok, error }`; `ok: false` becomes an
//! `AppError::Notification` carrying Slack's error string (for example
//! `invalid_auth` or `channel_not_found`). Dispatch failures are isolated
//! per channel by the caller, never retried here.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::SlackConfig;
use crate::error::{AppError, Result};
use crate::models::Block;

const SLACK_API_BASE: &str = "https://slack.com/api";

/// Outbound notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a block message to a channel.
    async fn post_blocks(&self, channel: &str, blocks: &[Block]) -> Result<()>;

    /// Delete a message by channel and timestamp.
    async fn delete_message(&self, channel: &str, ts: &str) -> Result<()>;

    /// Post an ephemeral message visible only to one user.
    async fn post_ephemeral(&self, channel: &str, user: &str, text: &str) -> Result<()>;
}

/// Slack Web API response envelope.
#[derive(Debug, Deserialize)]
struct SlackEnvelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Slack Web API.
pub struct SlackClient {
    client: Client,
    bot_token: String,
    admin_token: Option<String>,
    api_base: String,
}

impl SlackClient {
    /// Create a client from the Slack configuration.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            admin_token: config.admin_token.clone(),
            api_base: SLACK_API_BASE.to_string(),
        })
    }

    /// Token used for message deletion. Deleting other users' messages
    /// needs an admin token; without one the bot token is tried.
    fn delete_token(&self) -> &str {
        self.admin_token.as_deref().unwrap_or(&self.bot_token)
    }

    /// Call a Slack Web API method and check the `{ ok, error }` envelope.
    async fn call(&self, method: &str, token: &str, payload: &serde_json::Value) -> Result<()> {
        let url = format!("{}/{}", self.api_base, method);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(format!(
                "{} answered {}",
                method, status
            )));
        }

        let envelope: SlackEnvelope = response.json().await?;
        if !envelope.ok {
            return Err(AppError::notification(format!(
                "{} failed: {}",
                method,
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackClient {
    async fn post_blocks(&self, channel: &str, blocks: &[Block]) -> Result<()> {
        let payload = json!({ "channel": channel, "blocks": blocks });
        self.call("chat.postMessage", &self.bot_token, &payload).await
    }

    async fn delete_message(&self, channel: &str, ts: &str) -> Result<()> {
        let payload = json!({ "channel": channel, "ts": ts });
        self.call("chat.delete", self.delete_token(), &payload).await
    }

    async fn post_ephemeral(&self, channel: &str, user: &str, text: &str) -> Result<()> {
        let payload = json!({ "channel": channel, "user": user, "text": text });
        self.call("chat.postEphemeral", &self.bot_token, &payload)
            .await
    }
}
