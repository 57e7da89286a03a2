//! Runtime configuration from environment variables.
//!
//! `BOT_TOKEN` is required unless a token is passed in; every other variable has a default.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "logs/statebot.log";
pub const DEFAULT_DATABASE_URL: &str = "statebot.db";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: String,
    pub database_url: String,
    pub poll_interval: Duration,
    pub private_chats_only: bool,
}

impl TelegramConfig {
    /// Loads from environment: BOT_TOKEN, TELEGRAM_API_URL (or TELOXIDE_API_URL), LOG_FILE,
    /// DATABASE_URL, POLL_INTERVAL_MS, PRIVATE_CHATS_ONLY.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Like [`from_env`](Self::from_env), but `token` (when given) wins over BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let poll_interval_ms = match env::var("POLL_INTERVAL_MS") {
            Ok(s) => s
                .parse::<u64>()
                .with_context(|| format!("POLL_INTERVAL_MS is not a number: {}", s))?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };
        let private_chats_only = match env::var("PRIVATE_CHATS_ONLY") {
            Ok(s) => parse_bool(&s)
                .with_context(|| format!("PRIVATE_CHATS_ONLY is not a boolean: {}", s))?,
            Err(_) => true,
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            private_chats_only,
        })
    }

    /// Uses the given token; everything else takes its default.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            private_chats_only: true,
        }
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("POLL_INTERVAL_MS must be greater than zero");
        }
        Ok(())
    }

    /// teloxide Bot for this token, pointed at the custom API URL when one is set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url {
            Some(ref url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url_str))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
