use std::time::Duration;

use thiserror::Error;

/// Message surfaced when a request went out but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// The request was sent but no response was received.
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponse,

    #[error("{0}")]
    Request(String),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    /// The record left its editable state and can no longer be changed.
    #[error("{0}")]
    Immutable(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api {
                retry_after_seconds: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            Self::NoResponse
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}
