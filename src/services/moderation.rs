//! Content-moderation API client.
//!
//! One GET per checked message: the service answers with a `bad_words`
//! flag and a cleaned copy of the text with flagged words replaced.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ModerationConfig;
use crate::error::{AppError, Result};

const MODERATE_CONTENT_URL: &str = "https://api.moderatecontent.com/text/";

/// Verdict for one piece of message text.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModerationVerdict {
    /// Whether the text contained flagged words
    #[serde(default)]
    pub bad_words: bool,

    /// The text with flagged words replaced
    #[serde(default)]
    pub clean: String,
}

/// Text moderation capability.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    /// Evaluate one message text.
    async fn check(&self, text: &str) -> Result<ModerationVerdict>;
}

/// HTTP client for the moderatecontent.com text endpoint.
pub struct ModerateContentClient {
    client: Client,
    key: String,
    replace: String,
}

impl ModerateContentClient {
    /// Create a client with the shared key and replacement text.
    pub fn new(config: &ModerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            key: config.key.clone(),
            replace: config.replace_text.clone(),
        })
    }
}

#[async_trait]
impl ModerationApi for ModerateContentClient {
    async fn check(&self, text: &str) -> Result<ModerationVerdict> {
        let response = self
            .client
            .get(MODERATE_CONTENT_URL)
            .query(&[
                ("key", self.key.as_str()),
                ("replace", self.replace.as_str()),
                ("msg", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::remote(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}
