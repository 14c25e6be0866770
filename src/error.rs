//! Error types for data access and local state.
//!
//! Errors are classified by recoverability:
//! - Retryable: network failures, timeouts, 5xx responses
//! - NonRetryable: bad payloads, storage failures, missing records
//! - RequiresUserAction: missing/invalid configuration, rejected credentials
//!
//! Nothing in this crate retries. The classification only drives the
//! notification shown to the user.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    // Non-retryable errors
    #[error("Request rejected ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("IO error: {0}")]
    Io(String),

    // Requires user action
    #[error("API base URL is not configured")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Returns true if repeating the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Timeout | AppError::Server { .. }
        )
    }

    /// Returns true if this error requires user action to resolve.
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            AppError::NotConfigured | AppError::Config(_) | AppError::Unauthorized(_)
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Network(_) => "Check your internet connection and try again.",
            AppError::Timeout => "The server took too long to respond. Try again.",
            AppError::Server { .. } => "The server had a problem. Try again in a moment.",
            AppError::Remote { .. } => "Check the values you entered and try again.",
            AppError::Decode(_) => "The server sent an unexpected response. Refresh the page.",
            AppError::NotFound(_) => "The record may have been deleted. Refresh the list.",
            AppError::InvalidInput(_) => "Check the values you entered and try again.",
            AppError::Storage(_) => "Check disk space and permissions for ~/.omniscope.",
            AppError::Io(_) => "Check file permissions and disk space.",
            AppError::NotConfigured => "Set apiBaseUrl in ~/.omniscope/config.json.",
            AppError::Config(_) => "Check your configuration in ~/.omniscope/config.json.",
            AppError::Unauthorized(_) => "Sign in again or update apiToken in your config.",
        }
    }

    /// Map an HTTP status and body message onto the error taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => AppError::Unauthorized(message),
            404 => AppError::NotFound(message),
            500..=599 => AppError::Server { status, message },
            _ => AppError::Remote { status, message },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout
        } else if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::from_status(status.as_u16(), err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

/// Transient user-facing notification (toast) for a failed operation.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        let kind = if err.requires_user_action() {
            NoticeKind::RequiresUserAction
        } else if err.is_retryable() {
            NoticeKind::Retryable
        } else {
            NoticeKind::NonRetryable
        };

        Notice {
            message: err.to_string(),
            kind,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
