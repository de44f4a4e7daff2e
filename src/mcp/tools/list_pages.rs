//! List pages tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct ListPagesHandler {
    services: Arc<Services>,
}

impl ListPagesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_limit() -> u64 {
    25
}

#[derive(Deserialize)]
struct ListPagesArgs {
    space_id: String,
    status: Option<String>,
    title: Option<String>,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    fetch_all: bool,
}

#[async_trait]
impl McpToolHandler for ListPagesHandler {
    fn name(&self) -> &str {
        "list_pages"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_pages".to_string(),
            description: "List pages in a Confluence space. Supports filtering by status \
                          ('current', 'draft', 'archived', 'trashed') and title. Returns \
                          one page of results by default; set fetch_all=true to page \
                          through every result."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "space_id": {
                        "type": "string",
                        "description": "Space ID to list pages from"
                    },
                    "status": {
                        "type": "string",
                        "description": "Filter by page status ('current', 'draft', 'archived', 'trashed')"
                    },
                    "title": {
                        "type": "string",
                        "description": "Filter by page title"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of pages to return per page",
                        "default": 25,
                        "minimum": 1
                    },
                    "fetch_all": {
                        "type": "boolean",
                        "description": "Fetch all pages of results",
                        "default": false
                    }
                },
                "required": ["space_id"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ListPagesArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.space_id, "space_id")?;

        let mut params = vec![
            ("limit".to_string(), args.limit.to_string()),
            ("space-id".to_string(), args.space_id.clone()),
        ];
        if let Some(status) = &args.status {
            params.push(("status".to_string(), status.clone()));
        }
        if let Some(title) = &args.title {
            params.push(("title".to_string(), title.clone()));
        }

        info!(
            "Listing pages in space {} (fetch_all={})",
            args.space_id, args.fetch_all
        );

        let space_id = &args.space_id;
        let result = if args.fetch_all {
            let pages = self.services.api.fetch_all("content", &params, None).await?;
            let count = pages.len();
            json!({
                "pages": pages,
                "count": count,
                "message": format!("Retrieved {count} pages from space {space_id}"),
            })
        } else {
            let response = self.services.api.get("content", &params).await?;
            let pages = response
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let count = pages.len();
            let total = response.get("size").and_then(Value::as_u64).unwrap_or(0);

            let mut message = format!("Retrieved {count} pages from space {space_id}");
            if total > count as u64 {
                message.push_str(&format!(
                    " (showing {count} of {total}, use fetch_all=true to get all)"
                ));
            }

            json!({
                "pages": pages,
                "count": count,
                "total": total,
                "message": message,
            })
        };

        Ok(json_content(&result))
    }
}
