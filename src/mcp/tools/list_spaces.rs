//! List spaces tool handler

use super::handler::{json_content, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct ListSpacesHandler {
    services: Arc<Services>,
}

impl ListSpacesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_limit() -> u64 {
    25
}

#[derive(Deserialize)]
struct ListSpacesArgs {
    keys: Option<Vec<String>>,
    status: Option<String>,
    #[serde(rename = "type")]
    space_type: Option<String>,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    fetch_all: bool,
}

#[async_trait]
impl McpToolHandler for ListSpacesHandler {
    fn name(&self) -> &str {
        "list_spaces"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_spaces".to_string(),
            description: "List spaces in Confluence. Supports filtering by space keys, \
                          status ('current', 'archived') and type ('global', 'personal'). \
                          Returns one page of results by default; set fetch_all=true to \
                          page through every space."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "keys": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Filter by space keys"
                    },
                    "status": {
                        "type": "string",
                        "description": "Filter by space status ('current', 'archived')"
                    },
                    "type": {
                        "type": "string",
                        "description": "Filter by space type ('global', 'personal')"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of spaces to return per page",
                        "default": 25,
                        "minimum": 1
                    },
                    "fetch_all": {
                        "type": "boolean",
                        "description": "Fetch all pages of results",
                        "default": false
                    }
                }
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ListSpacesArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let mut params = vec![("limit".to_string(), args.limit.to_string())];
        // An empty keys list means no filter, not `keys=`
        if let Some(keys) = args.keys.as_deref().filter(|k| !k.is_empty()) {
            params.push(("keys".to_string(), keys.join(",")));
        }
        if let Some(status) = &args.status {
            params.push(("status".to_string(), status.clone()));
        }
        if let Some(space_type) = &args.space_type {
            params.push(("type".to_string(), space_type.clone()));
        }

        info!("Listing spaces (fetch_all={})", args.fetch_all);

        let result = if args.fetch_all {
            let spaces = self.services.api.fetch_all("spaces", &params, None).await?;
            let count = spaces.len();
            json!({
                "spaces": spaces,
                "count": count,
                "message": format!("Retrieved {count} spaces"),
            })
        } else {
            let response = self.services.api.get("spaces", &params).await?;
            let spaces = response
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let count = spaces.len();
            let total = response.get("size").and_then(Value::as_u64).unwrap_or(0);

            let mut message = format!("Retrieved {count} spaces");
            if total > count as u64 {
                message.push_str(&format!(
                    " (showing {count} of {total}, use fetch_all=true to get all)"
                ));
            }

            json!({
                "spaces": spaces,
                "count": count,
                "total": total,
                "message": message,
            })
        };

        Ok(json_content(&result))
    }
}
