// src/errors.rs - API error taxonomy
use reqwest::StatusCode;
use thiserror::Error;

/// Failures from the monitoring API, split the way the UI needs them:
/// transport problems (server unreachable, timeout, bad body) versus an
/// HTTP error status carrying the backend's `detail` string.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{detail}")]
    Backend { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// The string shown in the error banner. Backend errors surface the
    /// `detail` verbatim; transport errors get the reqwest description.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(e) => format!("Request failed: {}", e),
            ApiError::Backend { detail, .. } => detail.clone(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
