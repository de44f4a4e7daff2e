//! Configuration for the Confluence MCP server.
//!
//! Settings are read from environment variables. The base URL is
//! normalized on load so the rest of the crate can assume a clean
//! `https://host` form without trailing slashes or `/wiki`.

use crate::core::error::{ConfluenceError, Result};
use std::env;

/// Environment variable holding the Confluence instance URL
pub const ENV_URL: &str = "CONFLUENCE_URL";
/// Environment variable holding the API token
pub const ENV_API_KEY: &str = "CONFLUENCE_API_KEY";
/// Environment variable holding the account email
pub const ENV_USER_EMAIL: &str = "CONFLUENCE_USER_EMAIL";
/// Environment variable enabling debug logging
pub const ENV_DEBUG: &str = "DEBUG";

/// Runtime settings for the server
#[derive(Debug, Clone)]
pub struct Settings {
    /// Normalized Confluence base URL (no trailing slash, no `/wiki`)
    pub base_url: String,
    /// Confluence API token
    pub api_key: String,
    /// Account email the token belongs to
    pub user_email: String,
    /// Enable debug logging
    pub debug: bool,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// All three Confluence variables are required; the error message
    /// for a missing variable includes the export line to set.
    pub fn from_env() -> Result<Self> {
        let base_url = require_var(
            ENV_URL,
            "your Confluence instance URL (e.g., https://your-domain.atlassian.net/wiki)",
        )?;
        let api_key = require_var(ENV_API_KEY, "your Confluence API token")?;
        let user_email = require_var(ENV_USER_EMAIL, "your Confluence user email")?;

        let debug = env::var(ENV_DEBUG)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            api_key,
            user_email,
            debug,
        })
    }

    /// REST API root derived from the base URL.
    ///
    /// Confluence Cloud REST v1 lives under `/wiki/rest/api`; the v2
    /// API has different endpoint structures and incomplete coverage.
    pub fn api_url(&self) -> String {
        format!("{}/wiki/rest/api", self.base_url)
    }

    /// Log which variables are set, never their secret values
    pub fn log_config(&self) {
        tracing::debug!("  {}: {}", ENV_URL, self.base_url);
        tracing::debug!("  {}: SET", ENV_API_KEY);
        tracing::debug!("  {}: {}", ENV_USER_EMAIL, self.user_email);
        tracing::debug!("  {}: {}", ENV_DEBUG, self.debug);
    }
}

fn require_var(name: &str, hint: &str) -> Result<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfluenceError::ConfigError(format!(
            "{name} is required. Please set the {name} environment variable to {hint}"
        ))),
    }
}

/// Normalize a Confluence base URL.
///
/// Strips trailing slashes and a trailing `/wiki` segment (the API
/// path re-adds it), and rejects URLs without an http(s) scheme.
pub fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfluenceError::InvalidUrl(format!(
            "{ENV_URL} must start with http:// or https://. Got: {url}"
        )));
    }

    let mut url = url.trim_end_matches('/').to_string();
    if let Some(stripped) = url.strip_suffix("/wiki") {
        url = stripped.to_string();
    }
    Ok(url)
}
