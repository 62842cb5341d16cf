pub mod ai;
pub mod auth;
pub mod discord;
pub mod schedule;
pub mod submissions;
pub mod telegram;
pub mod twitter;

use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{AppError, AppResult},
    session::Session,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5193/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, session))
    }

    pub fn with_client(client: Client, base_url: &str, session: Session) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, &url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let builder = self.request(Method::GET, path).query(query);
        decode(send(builder).await?).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path).json(body);
        decode(send(builder).await?).await
    }

    /// Sends a JSON body and ignores whatever the backend answers on success.
    pub(crate) async fn send_json_unit<B>(&self, method: Method, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(method, path).json(body);
        send(builder).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

async fn send(builder: RequestBuilder) -> AppResult<Response> {
    let response = builder.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let retry_after_header = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    Err(error_from_response(status, &body, retry_after_header))
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

// Message order: body `error`, `message`, `title`, raw body, status line.
pub fn error_from_response(status: StatusCode, body: &str, retry_after_header: Option<u64>) -> AppError {
    let json = serde_json::from_str::<serde_json::Value>(body).ok();

    let message = json
        .as_ref()
        .and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => ["error", "message", "title"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
                .map(str::to_string),
            _ => None,
        })
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && json.is_none()).then(|| text.to_string())
        })
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

    let retry_after_seconds = json
        .as_ref()
        .and_then(|value| value.get("retryAfterSeconds"))
        .and_then(|v| v.as_u64())
        .or(retry_after_header);

    AppError::Api {
        status: status.as_u16(),
        message,
        retry_after_seconds,
    }
}
