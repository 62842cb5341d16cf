use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Discord,
    Telegram,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Discord => "discord",
            Platform::Telegram => "telegram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A Twitter, Discord or Telegram account connected to the current user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccount {
    pub id: i64,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, alias = "createdAt")]
    pub connected_at: Option<DateTime<Utc>>,
}

impl PlatformAccount {
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .or(self.telegram_id.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterConnectRequest {
    pub code: String,
    pub redirect_uri: String,
    pub code_verifier: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConnectRequest {
    pub code: String,
    pub redirect_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConnectRequest {
    pub bot_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramSendRequest {
    pub chat_id: String,
    pub message: String,
}
