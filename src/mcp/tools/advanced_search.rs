//! Advanced search tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct AdvancedSearchHandler {
    services: Arc<Services>,
}

impl AdvancedSearchHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

fn default_limit() -> u64 {
    25
}

#[derive(Deserialize)]
struct AdvancedSearchArgs {
    cql: String,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    fetch_all: bool,
}

#[async_trait]
impl McpToolHandler for AdvancedSearchHandler {
    fn name(&self) -> &str {
        "advanced_search"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "advanced_search".to_string(),
            description: "Perform an advanced search using a raw CQL (Confluence Query \
                          Language) query, e.g. 'type = page AND label = \"runbook\" \
                          ORDER BY lastmodified DESC'. Use search_content for simple \
                          free-text searches."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "cql": {
                        "type": "string",
                        "description": "Confluence Query Language query string"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return per page",
                        "default": 25,
                        "minimum": 1
                    },
                    "fetch_all": {
                        "type": "boolean",
                        "description": "Fetch all pages of results",
                        "default": false
                    }
                },
                "required": ["cql"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: AdvancedSearchArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.cql, "cql")?;

        info!("Performing advanced search with CQL: {}", args.cql);

        let params = vec![
            ("cql".to_string(), args.cql.clone()),
            ("limit".to_string(), args.limit.to_string()),
        ];

        let result = if args.fetch_all {
            let results = self.services.api.fetch_all("search", &params, None).await?;
            let count = results.len();
            json!({
                "results": results,
                "count": count,
                "message": format!("Found {count} results for advanced search"),
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

            let mut message = format!("Found {count} results for advanced search");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::mock::MockApi;
    use crate::core::client::WikiApi;
    use crate::core::config::Settings;
    use crate::mcp::protocol::ContentBlock;

    fn setup() -> (Arc<MockApi>, AdvancedSearchHandler) {
        let api = Arc::new(MockApi::new());
        let settings = Settings {
            base_url: "https://example.atlassian.net".to_string(),
            api_key: "token".to_string(),
            user_email: "dev@example.com".to_string(),
            debug: false,
        };
        let services = Arc::new(Services::with_api(
            settings,
            Arc::clone(&api) as Arc<dyn WikiApi>,
        ));
        (api, AdvancedSearchHandler::new(services))
    }

    fn result_json(result: ToolResult) -> Value {
        match &result.content[0] {
            ContentBlock::Text { text } => serde_json::from_str(text).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_advanced_search_passes_cql_verbatim() {
        let (api, handler) = setup();
        api.push_ok(json!({"results": [{"title": "Doc"}], "totalSize": 1}));

        let args = json!({"cql": "type = page ORDER BY created DESC"});
        let value = result_json(handler.execute(args).await.unwrap());

        assert_eq!(value["count"], 1);
        assert_eq!(value["message"], "Found 1 results for advanced search");

        let calls = api.calls();
        assert_eq!(calls[0].path, "search");
        assert!(calls[0].query.contains(&(
            "cql".to_string(),
            "type = page ORDER BY created DESC".to_string()
        )));
    }

    #[tokio::test]
    async fn test_empty_cql_rejected() {
        let (_api, handler) = setup();
        let err = handler.execute(json!({"cql": ""})).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_invalid_cql_surfaces_api_error() {
        let (api, handler) = setup();
        api.push_err(crate::core::error::ConfluenceError::Api {
            status: 400,
            message: "Could not parse cql".to_string(),
            details: Some("Expected operator".to_string()),
        });

        let err = handler
            .execute(json!({"cql": "title =="}))
            .await
            .unwrap_err();
        match err {
            McpError::ToolError(_, message) => {
                assert!(message.contains("Could not parse cql"));
                assert!(message.contains("Expected operator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let (api, handler) = setup();
        api.push_ok(json!({
            "results": [{"id": 1}],
            "_links": {"next": "more"}
        }));
        api.push_ok(json!({
            "results": [],
            "_links": {}
        }));

        let args = json!({"cql": "type = page", "limit": 1, "fetch_all": true});
        let value = result_json(handler.execute(args).await.unwrap());
        assert_eq!(value["count"], 1);
    }
}
