//! Update page tool handler

use super::handler::{json_content, require_non_empty, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct UpdatePageHandler {
    services: Arc<Services>,
}

impl UpdatePageHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
struct UpdatePageArgs {
    id: String,
    title: Option<String>,
    body: Option<Value>,
    version: Option<Value>,
    status: Option<String>,
}

#[async_trait]
impl McpToolHandler for UpdatePageHandler {
    fn name(&self) -> &str {
        "update_page"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_page".to_string(),
            description: "Update an existing Confluence page. Only the provided fields are \
                          changed. The version object ('number' and 'message' keys) is \
                          required by the API; when omitted the current version is fetched \
                          and auto-incremented."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Page ID to update"
                    },
                    "title": {
                        "type": "string",
                        "description": "New page title"
                    },
                    "body": {
                        "type": "object",
                        "description": "New page body with 'representation' and 'value' keys"
                    },
                    "version": {
                        "type": "object",
                        "description": "Version information with 'number' and 'message' keys",
                        "properties": {
                            "number": {"type": "integer"},
                            "message": {"type": "string"}
                        }
                    },
                    "status": {
                        "type": "string",
                        "description": "New page status ('current' or 'draft')"
                    }
                },
                "required": ["id"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: UpdatePageArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        require_non_empty(&args.id, "id")?;

        info!("Updating page {}", args.id);

        // The API requires a version; fetch the current page and
        // auto-increment when the caller didn't supply one.
        let version = match args.version {
            Some(version) => version,
            None => {
                let current = self
                    .services
                    .api
                    .get(&format!("content/{}", args.id), &[])
                    .await?;
                let number = current
                    .pointer("/version/number")
                    .and_then(Value::as_u64)
                    .unwrap_or(1)
                    + 1;
                info!("Auto-incrementing version to {number}");
                json!({"number": number, "message": "Updated via MCP"})
            }
        };

        let mut data = json!({
            "id": args.id,
            "version": version,
        });
        if let Some(title) = &args.title {
            data["title"] = json!(title);
        }
        if let Some(body) = &args.body {
            data["body"] = body.clone();
        }
        if let Some(status) = &args.status {
            data["status"] = json!(status);
        }

        let page = self
            .services
            .api
            .put(&format!("content/{}", args.id), &data)
            .await?;

        let title = page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&args.id)
            .to_string();

        Ok(json_content(&json!({
            "page": page,
            "message": format!("Page {title} updated successfully"),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::mock::MockApi;
    use crate::core::client::WikiApi;
    use crate::core::config::Settings;
    use crate::mcp::protocol::ContentBlock;

    fn setup() -> (Arc<MockApi>, UpdatePageHandler) {
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
        (api, UpdatePageHandler::new(services))
    }

    fn result_json(result: ToolResult) -> Value {
        match &result.content[0] {
            ContentBlock::Text { text } => serde_json::from_str(text).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_update_with_explicit_version() {
        let (api, handler) = setup();
        api.push_ok(json!({"id": "100", "title": "Renamed"}));

        let args = json!({
            "id": "100",
            "title": "Renamed",
            "version": {"number": 5, "message": "rename"}
        });
        let value = result_json(handler.execute(args).await.unwrap());

        assert_eq!(value["message"], "Page Renamed updated successfully");

        let calls = api.calls();
        // No extra GET when the version is supplied
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "PUT");
        assert_eq!(calls[0].path, "content/100");
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["version"]["number"], 5);
        assert_eq!(body["title"], "Renamed");
        assert!(body.get("body").is_none());
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_update_auto_increments_version() {
        let (api, handler) = setup();
        api.push_ok(json!({"id": "100", "version": {"number": 3}}));
        api.push_ok(json!({"id": "100", "title": "Doc"}));

        let args = json!({
            "id": "100",
            "body": {"representation": "storage", "value": "<p>new</p>"}
        });
        handler.execute(args).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "content/100");
        assert_eq!(calls[1].method, "PUT");

        let body = calls[1].body.as_ref().unwrap();
        assert_eq!(body["version"]["number"], 4);
        assert_eq!(body["version"]["message"], "Updated via MCP");
    }

    #[tokio::test]
    async fn test_auto_increment_defaults_to_version_two() {
        let (api, handler) = setup();
        // current page carries no version block
        api.push_ok(json!({"id": "100"}));
        api.push_ok(json!({"id": "100"}));

        handler
            .execute(json!({"id": "100", "title": "T"}))
            .await
            .unwrap();

        let body = api.calls()[1].body.clone().unwrap();
        assert_eq!(body["version"]["number"], 2);
    }

    #[tokio::test]
    async fn test_version_fetch_failure_propagates() {
        let (api, handler) = setup();
        api.push_err(crate::core::error::ConfluenceError::Api {
            status: 404,
            message: "No content found with id".to_string(),
            details: None,
        });

        let err = handler
            .execute(json!({"id": "999", "title": "T"}))
            .await
            .unwrap_err();
        match err {
            McpError::ToolError(_, message) => {
                assert!(message.contains("No content found with id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_id_rejected() {
        let (_api, handler) = setup();
        let err = handler.execute(json!({"title": "T"})).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }
}
