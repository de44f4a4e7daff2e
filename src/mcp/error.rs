//! MCP-specific error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool error (code {0}): {1}")]
    ToolError(i32, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<crate::core::error::ConfluenceError> for McpError {
    fn from(err: crate::core::error::ConfluenceError) -> Self {
        use crate::core::error::ConfluenceError;
        use crate::mcp::protocol::{API_ERROR, NETWORK_ERROR};
        match err {
            // Display includes the API's own message plus status/details,
            // matching what the original service surfaced to clients.
            ConfluenceError::Api { .. } => McpError::ToolError(API_ERROR, err.to_string()),
            ConfluenceError::Network { .. } => McpError::ToolError(NETWORK_ERROR, err.to_string()),
            ConfluenceError::ConfigError(s) => {
                McpError::InvalidParams(format!("Configuration error: {s}"))
            }
            ConfluenceError::InvalidUrl(s) => {
                McpError::InvalidParams(format!("Invalid Confluence URL: {s}"))
            }
            ConfluenceError::InvalidResponse(s) => {
                McpError::InternalError(format!("Invalid API response: {s}"))
            }
            ConfluenceError::SerdeError(e) => {
                McpError::InternalError(format!("Serialization error: {e}"))
            }
        }
    }
}
