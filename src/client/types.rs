#![forbid(unsafe_code)]

// Common types and error handling for the client module

use std::time::Duration;
use thiserror::Error;

/// The only status the game service uses for success.
pub const SUCCESS_STATUS: u16 = 200;

/// Failure below the HTTP status line: the service never answered usefully.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Recoverable realtime channel fault.
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Send timed out after {0:?}")]
    SendTimeout(Duration),

    #[error("Close failed: {0}")]
    Close(String),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Status line of an answered request, plus the decoded body when one is
/// expected and the status was a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T = ()> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn status_only(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn with_body(status: u16, body: T) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}
