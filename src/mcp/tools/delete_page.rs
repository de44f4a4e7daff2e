//! Delete page tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct DeletePageHandler {
    services: Arc<Services>,
}

impl DeletePageHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
struct DeletePageArgs {
    id: String,
}

#[async_trait]
impl McpToolHandler for DeletePageHandler {
    fn name(&self) -> &str {
        "delete_page"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_page".to_string(),
            description: "Delete a Confluence page by ID. The page is moved to the trash; \
                          restoring it requires the Confluence UI."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Page ID to delete"
                    }
                },
                "required": ["id"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: DeletePageArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.id, "id")?;

        info!("Deleting page {}", args.id);

        self.services
            .api
            .delete(&format!("content/{}", args.id))
            .await?;

        let id = &args.id;
        Ok(json_content(&json!({
            "id": id,
            "deleted": true,
            "message": format!("Page with ID {id} deleted successfully"),
        })))
    }
}
