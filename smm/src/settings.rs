use std::{env, path::PathBuf, time::Duration};

use config::{Config, File};
use log::debug;
use serde::Deserialize;

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub twitter_client_id: Option<String>,
    pub twitter_redirect_uri: Option<String>,
    pub discord_client_id: Option<String>,
    pub discord_redirect_uri: Option<String>,
    pub store_path: Option<PathBuf>,
}

/// Settings with every default filled in.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub api_url: String,
    pub timeout: Duration,
    pub twitter_client_id: String,
    pub twitter_redirect_uri: String,
    pub discord_client_id: String,
    pub discord_redirect_uri: String,
    pub store_path: PathBuf,
}

const CONFIG_FILE_NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_TWITTER_REDIRECT_URI: &str = "http://localhost:3000/twitter/callback";
pub const DEFAULT_DISCORD_REDIRECT_URI: &str = "http://localhost:3000/discord/callback";

// Function to get the XDG_CONFIG_HOME path
fn get_xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config));
    }

    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config"));
    }

    None
}

fn get_xdg_data_path() -> Option<PathBuf> {
    if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg_data));
    }

    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".local").join("share"));
    }

    None
}

pub fn config_file_path() -> Option<PathBuf> {
    get_xdg_config_path().map(|dir| dir.join(CONFIG_FILE_NAME).join("config.toml"))
}

pub fn default_store_path() -> PathBuf {
    get_xdg_data_path()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
        .join("store.json")
}

pub fn load_settings() -> anyhow::Result<Settings> {
    match config_file_path() {
        Some(config_path) if config_path.exists() => load_settings_from(&config_path),
        _ => Ok(Settings::default()),
    }
}

pub fn load_settings_from(config_path: &std::path::Path) -> anyhow::Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from(config_path.to_path_buf()).required(false))
        .build()?
        .try_deserialize()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to deserialize config file {}: {}",
                config_path.display(),
                e
            )
        })?;

    debug!("loaded settings from {}", config_path.display());
    Ok(settings)
}

impl Settings {
    /// Fills every field left empty in `self` from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        // Empty strings count as unset, so a blank env var does not hide the file
        macro_rules! pick {
            ($field:ident) => {
                self.$field
                    .filter(|value| !value.is_empty())
                    .or(fallback.$field)
            };
        }

        Settings {
            api_url: pick!(api_url),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            twitter_client_id: pick!(twitter_client_id),
            twitter_redirect_uri: pick!(twitter_redirect_uri),
            discord_client_id: pick!(discord_client_id),
            discord_redirect_uri: pick!(discord_redirect_uri),
            store_path: self.store_path.or(fallback.store_path),
        }
    }

    pub fn resolve(self) -> ResolvedSettings {
        let resolved = ResolvedSettings {
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            twitter_client_id: self.twitter_client_id.unwrap_or_default(),
            twitter_redirect_uri: self
                .twitter_redirect_uri
                .unwrap_or_else(|| DEFAULT_TWITTER_REDIRECT_URI.to_string()),
            discord_client_id: self.discord_client_id.unwrap_or_default(),
            discord_redirect_uri: self
                .discord_redirect_uri
                .unwrap_or_else(|| DEFAULT_DISCORD_REDIRECT_URI.to_string()),
            store_path: self.store_path.unwrap_or_else(default_store_path),
        };

        debug!("resolved settings: {:?}", resolved);
        resolved
    }
}
