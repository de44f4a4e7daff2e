//! Service container for the MCP tool handlers.

use crate::core::client::{ConfluenceClient, WikiApi};
use crate::core::config::Settings;
use crate::core::error::Result;
use std::sync::Arc;

/// Shared services for all MCP tool handlers
pub struct Services {
    pub config: Settings,
    pub api: Arc<dyn WikiApi>,
}

impl Services {
    /// Create services backed by the production REST client
    pub fn new(config: Settings) -> Result<Self> {
        let api = Arc::new(ConfluenceClient::new(&config)?);
        Ok(Self { config, api })
    }

    /// Create services with a custom transport (tests, alternate clients)
    pub fn with_api(config: Settings, api: Arc<dyn WikiApi>) -> Self {
        Self { config, api }
    }
}
