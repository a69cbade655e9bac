//! Error type for the Culinary Compass API client.
//!
//! Every client operation returns [`ApiError`]. The page layer never shows
//! these to the user directly: [`crate::api::Api::request`] reduces them to a
//! toast, and opens the auth modal for the unauthorized cases.

use reqwest::StatusCode;
use thiserror::Error;

/// Fallback toast text when the server gives no usable message.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached
    #[error("Failed to connect to recipe server: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request to recipe server timed out")]
    Timeout,

    /// 401 from the server: the token is missing, expired or rejected
    #[error("Authentication required: {}", .message.as_deref().unwrap_or("token rejected"))]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx status
    #[error("Request failed with status {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// The response body was not the expected shape
    #[error("Invalid response from recipe server: {0}")]
    Decode(String),

    /// A write action was attempted without a stored token
    #[error("Not authenticated - please log in first")]
    NotAuthenticated,

    /// The request was rejected locally before being sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }

    /// Build the error for a non-2xx response from its status and the
    /// backend's `msg`, if any.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status { status, message }
        }
    }

    /// Whether this failure should bring up the auth modal.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::NotAuthenticated)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown in the error toast: the server's own message when it sent
    /// one, otherwise a generic line.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message: Some(m) } | ApiError::Status { message: Some(m), .. } => {
                m.clone()
            }
            ApiError::NotAuthenticated => "Please log in to continue.".to_string(),
            ApiError::InvalidInput(m) => m.clone(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }
}
