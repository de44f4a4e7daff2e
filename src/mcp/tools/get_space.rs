//! Get space tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct GetSpaceHandler {
    services: Arc<Services>,
}

impl GetSpaceHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
struct GetSpaceArgs {
    id: String,
}

#[async_trait]
impl McpToolHandler for GetSpaceHandler {
    fn name(&self) -> &str {
        "get_space"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_space".to_string(),
            description: "Get a Confluence space by ID. Use list_spaces to discover space IDs."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Space ID"
                    }
                },
                "required": ["id"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: GetSpaceArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.id, "id")?;

        info!("Getting space with ID: {}", args.id);

        let space = self
            .services
            .api
            .get(&format!("spaces/{}", args.id), &[])
            .await?;

        let name = space
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&args.id)
            .to_string();

        Ok(json_content(&json!({
            "space": space,
            "message": format!("Space {name} retrieved successfully"),
        })))
    }
}
