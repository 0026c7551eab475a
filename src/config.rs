// Configuration module
//
// Resolution order:
//   1. Environment variables (for CI / scheduled cloud runs)
//   2. config.json next to the working directory (for local runs)
// Absence of both is a fatal startup condition.
//
// The loaded Config is passed by parameter into the generation, watermark
// and delivery stages; nothing reads configuration ambiently.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BotError;

fn default_watermark_text() -> String {
    "@saba_rasanehh".to_string()
}

fn default_watermark_title() -> Option<String> {
    Some("صبا رسانه".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bot credential for the Telegram Bot API
    pub telegram_bot_token: String,

    /// Channel the photo is posted to (numeric id or @name)
    pub telegram_channel_id: String,

    /// Primary watermark line: the channel handle
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    /// Optional native-script secondary line, also shown in the caption.
    /// When absent the watermark collapses to a single line.
    #[serde(default = "default_watermark_title")]
    pub watermark_title: Option<String>,
}

impl Config {
    /// Resolve configuration: environment first, then `config.json`.
    pub fn load() -> Result<Self, BotError> {
        if let Some(config) = Self::from_env_lookup(|name| std::env::var(name).ok()) {
            return Ok(config);
        }
        Self::from_file("config.json")
    }

    /// Build a Config from an environment-style lookup function.
    ///
    /// Returns None when `TELEGRAM_BOT_TOKEN` is unset, signalling the
    /// caller to fall back to the config file.
    pub fn from_env_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")?;
        let telegram_channel_id = lookup("TELEGRAM_CHANNEL_ID").unwrap_or_default();

        Some(Self {
            telegram_bot_token,
            telegram_channel_id,
            watermark_text: lookup("WATERMARK_TEXT").unwrap_or_else(default_watermark_text),
            watermark_title: lookup("WATERMARK_TITLE").or_else(default_watermark_title),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BotError> {
        let json = std::fs::read_to_string(&path).map_err(|_| {
            BotError::Config(
                "configuration not found (no env vars and no config.json)".to_string(),
            )
        })?;

        let config: Config = serde_json::from_str(&json)
            .map_err(|e| BotError::Config(format!("invalid JSON in config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BotError> {
        if self.telegram_bot_token.is_empty() {
            return Err(BotError::Config(
                "telegram_bot_token cannot be empty".to_string(),
            ));
        }
        if self.telegram_channel_id.is_empty() {
            return Err(BotError::Config(
                "telegram_channel_id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
