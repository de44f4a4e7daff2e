//! Create page tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct CreatePageHandler {
    services: Arc<Services>,
}

impl CreatePageHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_status() -> String {
    "current".to_string()
}

#[derive(Deserialize)]
struct CreatePageArgs {
    space_id: String,
    title: String,
    body: Value,
    parent_id: Option<String>,
    #[serde(default = "default_status")]
    status: String,
}

#[async_trait]
impl McpToolHandler for CreatePageHandler {
    fn name(&self) -> &str {
        "create_page"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_page".to_string(),
            description: "Create a new page in a Confluence space. The body is an object \
                          with 'representation' (usually 'storage') and 'value' (the page \
                          content) keys. Pass parent_id to create the page under an \
                          existing page."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "space_id": {
                        "type": "string",
                        "description": "ID of the space to create the page in"
                    },
                    "title": {
                        "type": "string",
                        "description": "Page title"
                    },
                    "body": {
                        "type": "object",
                        "description": "Page body content with 'representation' and 'value' keys",
                        "properties": {
                            "representation": {"type": "string"},
                            "value": {"type": "string"}
                        }
                    },
                    "parent_id": {
                        "type": "string",
                        "description": "Parent page ID"
                    },
                    "status": {
                        "type": "string",
                        "description": "Page status ('current' or 'draft')",
                        "default": "current"
                    }
                },
                "required": ["space_id", "title", "body"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: CreatePageArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.space_id, "space_id")?;
        require_non_empty(&args.title, "title")?;
        if !args.body.is_object() {
            return Err(McpError::InvalidParams(
                "body must be an object with 'representation' and 'value' keys".to_string(),
            ));
        }

        let mut data = json!({
            "spaceId": args.space_id,
            "title": args.title,
            "body": args.body,
            "status": args.status,
        });
        if let Some(parent_id) = &args.parent_id {
            data["parentId"] = json!(parent_id);
        }

        info!("Creating page '{}' in space {}", args.title, args.space_id);

        let page = self.services.api.post("content", &data).await?;

        let title = &args.title;
        Ok(json_content(&json!({
            "page": page,
            "message": format!("Page '{title}' created successfully"),
        })))
    }
}
