//! Confluence REST API client.
//!
//! Wraps `reqwest` with Basic-Auth headers, a bounded retry loop for
//! transient failures, API error mapping and offset pagination. The
//! [`WikiApi`] trait is the seam the tool layer depends on, so tests
//! can substitute a mock transport.

use crate::core::config::Settings;
use crate::core::error::{ConfluenceError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Request timeout duration
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default page size for paginated endpoints
const DEFAULT_PAGE_LIMIT: u64 = 25;

/// Maximum retry attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Fixed delay between retries in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Retry behavior for transient request failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries (used by the config probe)
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Run an operation, retrying transient errors per the policy.
///
/// Only errors reporting `is_retryable()` are retried; others
/// surface immediately.
async fn with_retries<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut retries = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                retries += 1;
                if retries > policy.max_retries {
                    error!("Failed after {} retries: {}", policy.max_retries, e);
                    return Err(e);
                }
                warn!(
                    "Transient error, retrying ({}/{}): {}",
                    retries, policy.max_retries, e
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Abstraction over the Confluence REST transport.
///
/// Tool handlers call through this trait; [`ConfluenceClient`] is the
/// production implementation.
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// GET an endpoint with query parameters
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    /// POST a JSON payload
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// PUT a JSON payload
    async fn put(&self, path: &str, body: &Value) -> Result<Value>;

    /// DELETE an endpoint
    async fn delete(&self, path: &str) -> Result<Value>;

    /// Fetch every page of a paginated endpoint.
    ///
    /// Loops `start`/`limit` offset pagination, collecting `results`
    /// arrays until the response carries no `_links.next` or returns
    /// a short page. `max_pages` caps the number of pages fetched.
    async fn fetch_all(
        &self,
        path: &str,
        query: &[(String, String)],
        max_pages: Option<usize>,
    ) -> Result<Vec<Value>> {
        let mut params: Vec<(String, String)> = query.to_vec();

        let mut start: u64 = get_param(&params, "start")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let limit: u64 = get_param(&params, "limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        set_param(&mut params, "start", start.to_string());
        set_param(&mut params, "limit", limit.to_string());

        let mut all_results = Vec::new();
        let mut page_num = 1usize;

        loop {
            let response = self.get(path, &params).await?;

            let results = response
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let page_len = results.len() as u64;
            all_results.extend(results);

            let has_next = response
                .pointer("/_links/next")
                .map(|v| !v.is_null())
                .unwrap_or(false);
            if !has_next || page_len < limit {
                break;
            }

            if let Some(max) = max_pages {
                if page_num >= max {
                    debug!("Reached maximum page limit ({max})");
                    break;
                }
            }

            start += limit;
            set_param(&mut params, "start", start.to_string());
            page_num += 1;
            debug!("Fetching page {page_num} for {path}");
        }

        debug!(
            "Fetched {} results from {} pages of {}",
            all_results.len(),
            page_num,
            path
        );
        Ok(all_results)
    }
}

fn get_param(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

fn set_param(params: &mut Vec<(String, String)>, name: &str, value: String) {
    match params.iter_mut().find(|(k, _)| k == name) {
        Some(entry) => entry.1 = value,
        None => params.push((name.to_string(), value)),
    }
}

/// Production client for the Confluence Cloud REST API
pub struct ConfluenceClient {
    http: reqwest::Client,
    api_url: String,
    retry: RetryPolicy,
}

impl ConfluenceClient {
    /// Build a client from settings with the default retry policy
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_retry_policy(settings, RetryPolicy::default())
    }

    /// Build a client with an explicit retry policy
    pub fn with_retry_policy(settings: &Settings, retry: RetryPolicy) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(settings)?)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfluenceError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        debug!("Initialized Confluence API client for {}", settings.base_url);

        Ok(Self {
            http,
            api_url: settings.api_url(),
            retry,
        })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        debug!("{method} {url}");

        with_retries(&self.retry, || {
            let mut req = self.http.request(method.clone(), &url).query(query);
            if let Some(body) = body {
                req = req.json(body);
            }
            let method = method.clone();
            async move {
                let response = req.send().await.map_err(|e| ConfluenceError::Network {
                    method: method.to_string(),
                    message: e.to_string(),
                })?;
                process_response(response).await
            }
        })
        .await
    }
}

#[async_trait]
impl WikiApi for ConfluenceClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }
}

/// Default headers attached to every outbound request
fn default_headers(settings: &Settings) -> Result<HeaderMap> {
    let token = basic_auth_token(&settings.user_email, &settings.api_key);
    let mut auth = HeaderValue::from_str(&format!("Basic {token}"))
        .map_err(|e| ConfluenceError::ConfigError(format!("Invalid credentials: {e}")))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Base64 token for HTTP Basic auth (`email:api_key`)
fn basic_auth_token(user_email: &str, api_key: &str) -> String {
    STANDARD.encode(format!("{user_email}:{api_key}"))
}

/// Map an HTTP response to a JSON value or an API error.
///
/// Error responses surface the API's own `message` and `details`
/// fields unchanged; only an empty message falls back to a
/// status-specific description. Empty success bodies become `{}`.
async fn process_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|e| ConfluenceError::Network {
        method: "response".to_string(),
        message: e.to_string(),
    })?;

    if status >= 400 {
        let (mut message, details) = if bytes.is_empty() {
            ("Unknown error".to_string(), None)
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(body) => (
                    body.get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("API request failed")
                        .to_string(),
                    body.get("details")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                ),
                Err(_) => ("Failed to parse error response".to_string(), None),
            }
        };

        if message.is_empty() {
            message = fallback_message(status).to_string();
        }

        error!("API error ({status}): {message}");
        return Err(ConfluenceError::Api {
            status,
            message,
            details,
        });
    }

    if bytes.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(&bytes).map_err(|e| ConfluenceError::InvalidResponse(e.to_string()))
}

/// Generic error description for a status code when the API gives none
fn fallback_message(status: u16) -> &'static str {
    match status {
        401 => "Authentication failed. Please check your API key and credentials.",
        403 => "Permission denied. You don't have access to this resource.",
        404 => "Resource not found. Please check the ID or path.",
        429 => "Rate limit exceeded. Please wait before making more requests.",
        _ => "API request failed",
    }
}
