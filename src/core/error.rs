//! Error types for the Confluence adapter.
//!
//! Protocol-specific error handling (MCP error codes) lives in the
//! MCP adapter module; this module covers configuration and REST
//! client failures.

use thiserror::Error;

/// Result type alias for Confluence operations
pub type Result<T> = std::result::Result<T, ConfluenceError>;

/// Main error type for the Confluence REST client
#[derive(Error, Debug)]
pub enum ConfluenceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid Confluence URL: {0}")]
    InvalidUrl(String),

    /// Error surfaced by the Confluence REST API. The message is the
    /// API's own error message, passed through unchanged.
    #[error("{message} (Status: {status}){}", detail_suffix(.details))]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Network error during {method} request: {message}")]
    Network { method: String, message: String },

    #[error("Failed to parse JSON response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

fn detail_suffix(details: &Option<String>) -> String {
    match details {
        Some(d) => format!(" - {d}"),
        None => String::new(),
    }
}

impl ConfluenceError {
    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ConfluenceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request that produced this error may be retried.
    ///
    /// Network failures and 5xx responses are transient; everything
    /// else (auth, not-found, validation) is surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConfluenceError::Network { .. } => true,
            ConfluenceError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfluenceError::Api { status: 404, .. })
    }

    /// Check if this is an authentication/permission error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ConfluenceError::Api { status: 401 | 403, .. })
    }
}
