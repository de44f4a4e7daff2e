//! MCP protocol handler integration tests
//!
//! Exercises the full dispatch path (request -> handler -> tool ->
//! transport-level response) against a scripted WikiApi transport.

use async_trait::async_trait;
use confluence_mcp::core::config::Settings;
use confluence_mcp::core::error::{ConfluenceError, Result};
use confluence_mcp::core::services::Services;
use confluence_mcp::mcp::handlers::ProtocolHandlers;
use confluence_mcp::mcp::protocol::*;
use confluence_mcp::WikiApi;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// WikiApi stub returning queued responses in order
#[derive(Default)]
struct ScriptedApi {
    responses: Mutex<VecDeque<Result<Value>>>,
}

impl ScriptedApi {
    fn new() -> Self {
        Self::default()
    }

    fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    fn push_err(&self, err: ConfluenceError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn pop(&self) -> Result<Value> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedApi: no queued response")
    }
}

#[async_trait]
impl WikiApi for ScriptedApi {
    async fn get(&self, _path: &str, _query: &[(String, String)]) -> Result<Value> {
        self.pop()
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<Value> {
        self.pop()
    }

    async fn put(&self, _path: &str, _body: &Value) -> Result<Value> {
        self.pop()
    }

    async fn delete(&self, _path: &str) -> Result<Value> {
        self.pop()
    }
}

fn test_settings() -> Settings {
    Settings {
        base_url: "https://example.atlassian.net".to_string(),
        api_key: "token".to_string(),
        user_email: "dev@example.com".to_string(),
        debug: false,
    }
}

fn setup() -> (Arc<ScriptedApi>, ProtocolHandlers) {
    let api = Arc::new(ScriptedApi::new());
    let services = Arc::new(Services::with_api(
        test_settings(),
        Arc::clone(&api) as Arc<dyn WikiApi>,
    ));
    (api, ProtocolHandlers::new(services))
}

fn request(method: &str, id: u64, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: method.to_string(),
        params,
    }
}

#[tokio::test]
async fn test_initialize_returns_server_info() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_initialize(request(
            "initialize",
            1,
            Some(json!({
                "protocolVersion": "2024-11-05",
                "clientInfo": {"name": "test-client", "version": "1.0"}
            })),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "confluence-mcp");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
}

#[tokio::test]
async fn test_initialized_notification_produces_no_response() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_initialized(JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "initialized".to_string(),
            params: None,
        })
        .await
        .unwrap();

    assert!(response.id.is_none());
    assert!(response.result.is_none());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_tools_list_exposes_all_capabilities() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_tools_list(request("tools/list", 2, None))
        .await
        .unwrap();

    let result = response.result.unwrap();
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 9);

    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in [
        "list_spaces",
        "get_space",
        "list_pages",
        "get_page",
        "create_page",
        "update_page",
        "delete_page",
        "search_content",
        "advanced_search",
    ] {
        assert!(names.contains(&expected), "missing tool: {expected}");
    }

    // Every tool carries a description and an object input schema
    for tool in tools {
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_tools_call_dispatches_to_handler() {
    let (api, handlers) = setup();
    api.push_ok(json!({"id": "42", "name": "Engineering"}));

    let response = handlers
        .handle_tools_call(request(
            "tools/call",
            3,
            Some(json!({
                "name": "get_space",
                "arguments": {"id": "42"}
            })),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["space"]["name"], "Engineering");
}

#[tokio::test]
async fn test_tools_call_missing_params() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_tools_call(request("tools/call", 4, None))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, INVALID_PARAMS);
    assert_eq!(error.message, "Missing params");
}

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_tools_call(request(
            "tools/call",
            5,
            Some(json!({"name": "reticulate_splines", "arguments": {}})),
        ))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, INVALID_REQUEST);
    assert!(error.message.contains("Tool not found"));
}

#[tokio::test]
async fn test_tools_call_invalid_arguments() {
    let (_api, handlers) = setup();

    // get_space requires an id
    let response = handlers
        .handle_tools_call(request(
            "tools/call",
            6,
            Some(json!({"name": "get_space", "arguments": {}})),
        ))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, INVALID_PARAMS);
}

#[tokio::test]
async fn test_tools_call_surfaces_api_error_message() {
    let (api, handlers) = setup();
    api.push_err(ConfluenceError::Api {
        status: 404,
        message: "No space found with id : 99".to_string(),
        details: None,
    });

    let response = handlers
        .handle_tools_call(request(
            "tools/call",
            7,
            Some(json!({"name": "get_space", "arguments": {"id": "99"}})),
        ))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, API_ERROR);
    assert!(error.message.contains("No space found with id : 99"));
    assert!(error.message.contains("404"));
}

#[tokio::test]
async fn test_tools_call_surfaces_network_error() {
    let (api, handlers) = setup();
    api.push_err(ConfluenceError::Network {
        method: "GET".to_string(),
        message: "connection refused".to_string(),
    });

    let response = handlers
        .handle_tools_call(request(
            "tools/call",
            8,
            Some(json!({"name": "list_spaces", "arguments": {}})),
        ))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, NETWORK_ERROR);
    assert!(error.message.contains("connection refused"));
}

#[tokio::test]
async fn test_dispatch_unknown_method() {
    let (_api, handlers) = setup();

    let response = handlers
        .dispatch(request("resources/list", 10, None))
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, METHOD_NOT_FOUND);
    assert!(error.message.contains("resources/list"));
    assert_eq!(response.id.unwrap(), json!(10));
}

#[tokio::test]
async fn test_dispatch_accepts_initialized_alias() {
    let (_api, handlers) = setup();

    // Both notification spellings route to the initialized handler
    for method in ["initialized", "notifications/initialized"] {
        let response = handlers
            .dispatch(JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: None,
                method: method.to_string(),
                params: None,
            })
            .await
            .unwrap();

        assert!(response.id.is_none(), "{method} should be a notification");
        assert!(response.result.is_none());
        assert!(response.error.is_none());
    }
}

#[tokio::test]
async fn test_dispatch_routes_tool_calls() {
    let (api, handlers) = setup();
    api.push_ok(json!({"id": "42", "name": "Engineering"}));

    let response = handlers
        .dispatch(request(
            "tools/call",
            11,
            Some(json!({"name": "get_space", "arguments": {"id": "42"}})),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    let text = response.result.unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    let payload: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(payload["space"]["name"], "Engineering");
}

#[tokio::test]
async fn test_ping() {
    let (_api, handlers) = setup();

    let response = handlers
        .handle_ping(request("ping", 9, None))
        .await
        .unwrap();

    assert!(response.error.is_none());
    assert_eq!(response.result.unwrap(), json!({}));
}
