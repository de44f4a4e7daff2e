//! Get page tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct GetPageHandler {
    services: Arc<Services>,
}

impl GetPageHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_body_format() -> String {
    "storage".to_string()
}

#[derive(Deserialize)]
struct GetPageArgs {
    id: String,
    version: Option<u64>,
    #[serde(default = "default_body_format")]
    body_format: String,
    expand: Option<Vec<String>>,
}

#[async_trait]
impl McpToolHandler for GetPageHandler {
    fn name(&self) -> &str {
        "get_page"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_page".to_string(),
            description: "Get a Confluence page by ID, optionally at a specific version. \
                          The body_format parameter selects the body representation \
                          ('storage', 'view', 'export_view', 'styled_view', \
                          'anonymous_export_view'); expand adds fields such as 'version', \
                          'body.view' or 'ancestors' to the response."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Page ID"
                    },
                    "version": {
                        "type": "integer",
                        "description": "Specific version number to retrieve"
                    },
                    "body_format": {
                        "type": "string",
                        "description": "Body format to retrieve",
                        "default": "storage"
                    },
                    "expand": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Additional fields to expand in the response"
                    }
                },
                "required": ["id"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: GetPageArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.id, "id")?;

        let mut params = vec![("body-format".to_string(), args.body_format.clone())];
        if let Some(expand) = &args.expand {
            params.push(("expand".to_string(), expand.join(",")));
        }

        let path = match args.version {
            Some(version) => format!("content/{}/versions/{version}", args.id),
            None => format!("content/{}", args.id),
        };

        info!(
            "Getting page {} (version: {:?}, format: {})",
            args.id, args.version, args.body_format
        );

        let page = self.services.api.get(&path, &params).await?;

        let title = page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&args.id)
            .to_string();

        Ok(json_content(&json!({
            "page": page,
            "message": format!("Page {title} retrieved successfully"),
        })))
    }
}
