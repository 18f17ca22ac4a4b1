// src/config.rs

//! Application configuration.
//!
//! Loaded once at startup from a TOML file, with secrets overridable from
//! the environment. The resolved configuration is immutable for the
//! process lifetime.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// CTFd scoreboard access
    #[serde(default)]
    pub ctfd: CtfdConfig,

    /// Slack API access and target channels
    #[serde(default)]
    pub slack: SlackConfig,

    /// Which solve events get announced, and with which image
    #[serde(default)]
    pub announce: AnnounceConfig,

    /// Message-text moderation
    #[serde(default)]
    pub moderation: ModerationConfig,
}

impl Config {
    /// Load configuration and apply environment overrides.
    ///
    /// A missing file falls back to defaults (secrets can still arrive via
    /// the environment). A file that exists but fails to parse is fatal:
    /// silently dropping an operator's settings would disable announcements
    /// they enabled.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Self = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            log::warn!("No config file at {:?}, using defaults", path);
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Pull secrets from the environment. Environment values win over the
    /// file so tokens never have to live on disk.
    fn apply_env(&mut self) {
        if let Ok(token) = env::var("CTFD_TOKEN") {
            self.ctfd.token = token;
        }
        if let Ok(token) = env::var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = token;
        }
        if let Ok(token) = env::var("SLACK_ADMIN_TOKEN") {
            self.slack.admin_token = Some(token);
        }
        if let Ok(key) = env::var("MODERATE_CONTENT_KEY") {
            self.moderation.key = key;
        }
        if let Ok(channels) = env::var("CTFD_CHANNELS") {
            self.slack.channels = channels
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
    }

    /// Validate settings required before serving any traffic.
    ///
    /// A missing required setting is fatal at startup (the process must
    /// exit before handling events).
    pub fn validate(&self) -> Result<()> {
        if self.ctfd.base_url.trim().is_empty() {
            return Err(AppError::config("ctfd.base_url is empty"));
        }
        if self.ctfd.token.trim().is_empty() {
            return Err(AppError::config("ctfd.token (or CTFD_TOKEN) must be set"));
        }
        if self.ctfd.timeout_secs == 0 {
            return Err(AppError::config("ctfd.timeout_secs must be > 0"));
        }
        if self.slack.bot_token.trim().is_empty() {
            return Err(AppError::config(
                "slack.bot_token (or SLACK_BOT_TOKEN) must be set",
            ));
        }
        if self.announce.any_enabled() && self.slack.channels.is_empty() {
            return Err(AppError::config(
                "slack.channels (or CTFD_CHANNELS) must name at least one channel",
            ));
        }
        if self.moderation.key.trim().is_empty() {
            return Err(AppError::config(
                "moderation.key (or MODERATE_CONTENT_KEY) must be set",
            ));
        }
        Ok(())
    }
}

/// CTFd API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtfdConfig {
    /// Base URL of the CTFd API (e.g. "https://ctf.example.com/api/v1/")
    #[serde(default = "defaults::ctfd_base_url")]
    pub base_url: String,

    /// Public site URL used to build links in announcements
    #[serde(default = "defaults::ctfd_site_url")]
    pub site_url: String,

    /// API access token (usually supplied via CTFD_TOKEN)
    #[serde(default)]
    pub token: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CtfdConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::ctfd_base_url(),
            site_url: defaults::ctfd_site_url(),
            token: String::new(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Slack API access settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token used for posting messages
    #[serde(default)]
    pub bot_token: String,

    /// Admin token used for deleting other users' messages.
    /// Falls back to the bot token when unset.
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Channels that receive solve announcements
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Announcement rules and their images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnounceConfig {
    /// Announce every correct submission
    #[serde(default)]
    pub post_solve: bool,

    /// Accessory image for plain solve announcements
    #[serde(default = "defaults::solve_image")]
    pub solve_image: String,

    /// Restrict plain solve announcements to teams currently in the top ten
    #[serde(default)]
    pub solve_top10_only: bool,

    /// Announce the first correct submission per challenge
    #[serde(default)]
    pub post_first_blood: bool,

    /// Accessory image for first blood announcements
    #[serde(default = "defaults::first_blood_image")]
    pub first_blood_image: String,

    /// Announce rank changes into/within the top ten
    #[serde(default)]
    pub post_place_change: bool,

    /// Accessory image for rank change announcements
    #[serde(default = "defaults::place_change_image")]
    pub place_change_image: String,
}

impl AnnounceConfig {
    /// Whether any announcement type is enabled at all.
    pub fn any_enabled(&self) -> bool {
        self.post_solve || self.post_first_blood || self.post_place_change
    }
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            post_solve: false,
            solve_image: defaults::solve_image(),
            solve_top10_only: false,
            post_first_blood: false,
            first_blood_image: defaults::first_blood_image(),
            post_place_change: false,
            place_change_image: defaults::place_change_image(),
        }
    }
}

/// Message-text moderation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Shared key for the moderation service
    #[serde(default)]
    pub key: String,

    /// Replacement string for flagged words in the cleaned text
    #[serde(default = "defaults::replace_text")]
    pub replace_text: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            replace_text: defaults::replace_text(),
        }
    }
}

mod defaults {
    pub fn ctfd_base_url() -> String {
        "https://ctf20.bsidestlv.com/api/v1/".into()
    }
    pub fn ctfd_site_url() -> String {
        "https://ctf20.bsidestlv.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; solvebot/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn solve_image() -> String {
        "https://i.imgur.com/SdvQx2F.jpg".into()
    }
    pub fn first_blood_image() -> String {
        "https://i.imgur.com/eLm2JG3.jpg".into()
    }
    pub fn place_change_image() -> String {
        "https://i.imgur.com/SdvQx2F.jpg".into()
    }
    pub fn replace_text() -> String {
        "***".into()
    }
}
