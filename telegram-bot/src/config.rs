//! Bot configuration, loaded from environment variables.

use chat_core::{ChatError, Result};
use std::env;

/// Telegram bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Base URL of the chat relay service.
    pub chat_service_url: String,
    /// Optional Telegram Bot API base URL override; set to point the bot at a
    /// mock server in tests. Env: `TELEGRAM_API_URL` or `TELOXIDE_API_URL`.
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
}

impl BotConfig {
    /// Loads configuration: `BOT_TOKEN` is required, everything else has a
    /// default or is optional.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("BOT_TOKEN").map_err(|_| ChatError::Config("BOT_TOKEN not set".to_string()))?;
        let chat_service_url =
            env::var("CHAT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok();

        Ok(Self {
            bot_token,
            chat_service_url,
            telegram_api_url,
            log_file,
        })
    }
}
