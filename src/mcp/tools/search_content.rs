//! Search content tool handler

use super::handler::{json_content, McpToolHandler};
use crate::core::cql::CqlQuery;
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct SearchContentHandler {
    services: Arc<Services>,
}

impl SearchContentHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_limit() -> u64 {
    25
}

#[derive(Deserialize)]
struct SearchContentArgs {
    #[serde(default)]
    query: String,
    space_id: Option<String>,
    content_type: Option<String>,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    include_archived: bool,
    #[serde(default)]
    fetch_all: bool,
    cql: Option<String>,
    created_after: Option<String>,
    created_before: Option<String>,
    updated_after: Option<String>,
    updated_before: Option<String>,
    creator: Option<String>,
    contributor: Option<String>,
}

impl SearchContentArgs {
    fn build_cql(&self) -> String {
        let mut cql = CqlQuery::new(&self.query).include_archived(self.include_archived);
        if let Some(space_id) = &self.space_id {
            cql = cql.space_id(space_id);
        }
        if let Some(content_type) = &self.content_type {
            cql = cql.content_type(content_type);
        }
        if let Some(date) = &self.created_after {
            cql = cql.created_after(date);
        }
        if let Some(date) = &self.created_before {
            cql = cql.created_before(date);
        }
        if let Some(date) = &self.updated_after {
            cql = cql.updated_after(date);
        }
        if let Some(date) = &self.updated_before {
            cql = cql.updated_before(date);
        }
        if let Some(creator) = &self.creator {
            cql = cql.creator(creator);
        }
        if let Some(contributor) = &self.contributor {
            cql = cql.contributor(contributor);
        }
        cql.build()
    }
}

#[async_trait]
impl McpToolHandler for SearchContentHandler {
    fn name(&self) -> &str {
        "search_content"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_content".to_string(),
            description: "Search for content in Confluence. Builds a CQL query from the \
                          free-text query plus optional space, content-type, date-range \
                          and author filters; a custom 'cql' parameter overrides all of \
                          them. Returns one page of results by default; set \
                          fetch_all=true to page through every match."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query string (ignored if cql is provided)"
                    },
                    "space_id": {
                        "type": "string",
                        "description": "Filter by space ID"
                    },
                    "content_type": {
                        "type": "string",
                        "description": "Filter by content type ('page', 'blogpost', 'comment', ...)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return per page",
                        "default": 25,
                        "minimum": 1
                    },
                    "include_archived": {
                        "type": "boolean",
                        "description": "Include archived content in search",
                        "default": false
                    },
                    "fetch_all": {
                        "type": "boolean",
                        "description": "Fetch all pages of results",
                        "default": false
                    },
                    "cql": {
                        "type": "string",
                        "description": "Custom CQL query string (overrides other parameters)"
                    },
                    "created_after": {
                        "type": "string",
                        "description": "Only content created on or after this ISO date (e.g. '2023-01-01')"
                    },
                    "created_before": {
                        "type": "string",
                        "description": "Only content created on or before this ISO date"
                    },
                    "updated_after": {
                        "type": "string",
                        "description": "Only content last modified on or after this ISO date"
                    },
                    "updated_before": {
                        "type": "string",
                        "description": "Only content last modified on or before this ISO date"
                    },
                    "creator": {
                        "type": "string",
                        "description": "Only content created by this user"
                    },
                    "contributor": {
                        "type": "string",
                        "description": "Only content this user contributed to"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: SearchContentArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let cql = match &args.cql {
            Some(cql) => {
                info!("Searching with custom CQL: {cql}");
                cql.clone()
            }
            None => {
                if args.query.trim().is_empty() {
                    return Err(McpError::InvalidParams(
                        "query cannot be empty unless cql is provided".to_string(),
                    ));
                }
                let cql = args.build_cql();
                info!("Searching with generated CQL: {cql}");
                cql
            }
        };

        let params = vec![
            ("limit".to_string(), args.limit.to_string()),
            ("cql".to_string(), cql),
        ];

        let query = &args.query;
        let result = if args.fetch_all {
            let results = self.services.api.fetch_all("search", &params, None).await?;
            let count = results.len();
            json!({
                "results": results,
                "count": count,
                "message": format!("Found {count} results for query '{query}'"),
            })
        } else {
            let response = self.services.api.get("search", &params).await?;
            let results = response
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let count = results.len();
            let total = response
                .get("totalSize")
                .and_then(Value::as_u64)
                .unwrap_or(0);

            let mut message = format!("Found {count} results for query '{query}'");
            if total > count as u64 {
                message.push_str(&format!(
                    " (showing {count} of {total}, use fetch_all=true to get all)"
                ));
            }

            json!({
                "results": results,
                "count": count,
                "total": total,
                "message": message,
            })
        };

        Ok(json_content(&result))
    }
}
