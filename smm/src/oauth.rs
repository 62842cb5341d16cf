use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use log::{info, warn};
use rand::RngCore;
use sha2::{Digest, Sha256};
use url::Url;

use crate::{
    api::{discord::DiscordApi, twitter::TwitterApi},
    error::{AppError, AppResult},
    models::{DiscordConnectRequest, PlatformAccount, TwitterConnectRequest},
    store::{KeyValueStore, TWITTER_CODE_VERIFIER_KEY, TWITTER_OAUTH_STATE_KEY},
};

pub const TWITTER_AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";
pub const TWITTER_SCOPES: &str = "tweet.read tweet.write users.read offline.access";
pub const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";
pub const DISCORD_SCOPES: &str = "identify guilds bot";

/// 32 random bytes, hex encoded.
pub fn generate_code_verifier() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// `BASE64URL(SHA256(verifier))` without padding.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectState {
    Idle,
    Loading,
    Success(PlatformAccount),
    Error(String),
}

pub struct TwitterConnect {
    client_id: String,
    redirect_uri: String,
    store: Arc<dyn KeyValueStore>,
    state: ConnectState,
}

impl TwitterConnect {
    pub fn new(client_id: String, redirect_uri: String, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client_id,
            redirect_uri,
            store,
            state: ConnectState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    pub fn begin(&mut self) -> AppResult<Url> {
        if self.client_id.is_empty() {
            return Err(AppError::Config("Twitter client id is not configured".to_string()));
        }

        let verifier = generate_code_verifier();
        let oauth_state = generate_state();
        self.store.set(TWITTER_CODE_VERIFIER_KEY, &verifier)?;
        self.store.set(TWITTER_OAUTH_STATE_KEY, &oauth_state)?;

        let url = Url::parse_with_params(
            TWITTER_AUTHORIZE_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", TWITTER_SCOPES),
                ("state", oauth_state.as_str()),
                ("code_challenge", code_challenge(&verifier).as_str()),
                ("code_challenge_method", "S256"),
            ],
        )?;

        self.state = ConnectState::Idle;
        Ok(url)
    }

    // The stored verifier and state are removed whatever the outcome.
    pub async fn complete<T>(
        &mut self,
        api: &T,
        code: &str,
        returned_state: Option<&str>,
    ) -> AppResult<PlatformAccount>
    where
        T: TwitterApi + ?Sized,
    {
        self.state = ConnectState::Loading;
        let result = self.exchange(api, code, returned_state).await;

        for key in [TWITTER_CODE_VERIFIER_KEY, TWITTER_OAUTH_STATE_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("cannot remove {}: {}", key, e);
            }
        }

        self.state = match &result {
            Ok(account) => {
                info!("connected Twitter account {}", account.display_name());
                ConnectState::Success(account.clone())
            }
            Err(e) => ConnectState::Error(e.to_string()),
        };
        result
    }

    async fn exchange<T>(
        &self,
        api: &T,
        code: &str,
        returned_state: Option<&str>,
    ) -> AppResult<PlatformAccount>
    where
        T: TwitterApi + ?Sized,
    {
        let verifier = self.store.get(TWITTER_CODE_VERIFIER_KEY)?.ok_or_else(|| {
            AppError::OAuth(
                "no pending Twitter authorization, start the connect flow again".to_string(),
            )
        })?;

        if let Some(returned_state) = returned_state {
            let expected = self.store.get(TWITTER_OAUTH_STATE_KEY)?;
            if expected.as_deref() != Some(returned_state) {
                return Err(AppError::OAuth(
                    "state returned by Twitter does not match".to_string(),
                ));
            }
        }

        let request = TwitterConnectRequest {
            code: code.to_string(),
            redirect_uri: self.redirect_uri.clone(),
            code_verifier: verifier,
        };
        api.connect(&request).await
    }
}

pub struct DiscordConnect {
    client_id: String,
    redirect_uri: String,
    state: ConnectState,
}

impl DiscordConnect {
    pub fn new(client_id: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            redirect_uri,
            state: ConnectState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    pub fn authorize_url(&self) -> AppResult<Url> {
        if self.client_id.is_empty() {
            return Err(AppError::Config("Discord client id is not configured".to_string()));
        }

        Ok(Url::parse_with_params(
            DISCORD_AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", DISCORD_SCOPES),
            ],
        )?)
    }

    pub async fn complete<D>(&mut self, api: &D, code: &str) -> AppResult<PlatformAccount>
    where
        D: DiscordApi + ?Sized,
    {
        self.state = ConnectState::Loading;
        let request = DiscordConnectRequest {
            code: code.to_string(),
            redirect_uri: self.redirect_uri.clone(),
        };
        let result = api.connect(&request).await;

        self.state = match &result {
            Ok(account) => {
                info!("connected Discord account {}", account.display_name());
                ConnectState::Success(account.clone())
            }
            Err(e) => ConnectState::Error(e.to_string()),
        };
        result
    }
}

/// Pulls `code` and `state` out of the URL the provider redirected to.
pub fn parse_callback(callback_url: &str) -> AppResult<(String, Option<String>)> {
    let url = Url::parse(callback_url)?;
    let mut code = None;
    let mut state = None;
    let mut error = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AppError::OAuth(format!("authorization denied: {error}")));
    }

    let code = code.ok_or_else(|| {
        AppError::OAuth("callback URL does not contain an authorization code".to_string())
    })?;
    Ok((code, state))
}
