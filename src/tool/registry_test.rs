// ABOUTME: Tests for tool Registry - registration, lookup, specs, invocation.
// ABOUTME: Uses small in-process tools instead of real adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::ToolError;

/// A simple test tool.
struct EchoTool;

#[async_trait::async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes input back"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "Text to echo" }
            },
            "required": ["message"]
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        vec![EnvVar::optional("ECHO_PREFIX", "Prefix for echoed text", Some(""))]
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = params["message"].as_str().unwrap_or("");
        Ok(ToolResult::text(message))
    }
}

/// A tool that counts close calls.
struct SessionTool {
    closed: Arc<AtomicUsize>,
    fail_close: bool,
}

#[async_trait::async_trait]
impl Tool for SessionTool {
    fn name(&self) -> &str {
        if self.fail_close { "session_b" } else { "session_a" }
    }

    fn description(&self) -> &str {
        "Holds a remote session"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::text("ok"))
    }

    async fn close(&self) -> Result<(), ToolError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(ToolError::Upstream("session already gone".into()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_register_and_get() {
    let registry = Registry::new();
    registry.register(EchoTool).await;

    let tool = registry.get("echo").await;
    assert!(tool.is_some());
    assert_eq!(tool.unwrap().name(), "echo");
}

#[tokio::test]
async fn test_get_nonexistent() {
    let registry = Registry::new();
    assert!(registry.get("nonexistent").await.is_none());
}

#[tokio::test]
async fn test_unregister() {
    let registry = Registry::new();
    registry.register(EchoTool).await;
    assert_eq!(registry.count().await, 1);

    let removed = registry.unregister("echo").await;
    assert!(removed.is_some());
    assert_eq!(registry.count().await, 0);
    assert!(registry.get("echo").await.is_none());
}

#[tokio::test]
async fn test_reregister_replaces() {
    let registry = Registry::new();
    registry.register(EchoTool).await;
    registry.register(EchoTool).await;
    assert_eq!(registry.count().await, 1);
}

#[tokio::test]
async fn test_list_and_matching() {
    let registry = Registry::new();
    let closed = Arc::new(AtomicUsize::new(0));
    registry.register(EchoTool).await;
    registry
        .register(SessionTool { closed: closed.clone(), fail_close: false })
        .await;
    registry
        .register(SessionTool { closed, fail_close: true })
        .await;

    assert_eq!(registry.list().await, vec!["echo", "session_a", "session_b"]);
    assert_eq!(
        registry.matching("session_*").await.unwrap(),
        vec!["session_a", "session_b"]
    );
    assert!(registry.matching("[").await.is_err());
}

#[tokio::test]
async fn test_descriptors() {
    let registry = Registry::new();
    registry.register(EchoTool).await;

    let defs = registry.descriptors().await;
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "echo");
    assert_eq!(defs[0].description, "Echoes input back");
    assert_eq!(defs[0].env_vars[0].name, "ECHO_PREFIX");
}

#[tokio::test]
async fn test_specs_layout() {
    let registry = Registry::new();
    registry.register(EchoTool).await;

    let specs = registry.specs().await;
    let echo = &specs[0];
    assert_eq!(echo["name"], "echo");
    assert_eq!(echo["run_params"][0]["name"], "message");
    assert_eq!(echo["run_params"][0]["description"], "Text to echo");
    assert_eq!(echo["run_params"][0]["required"], true);
    assert_eq!(echo["env_vars"][0]["required"], false);
}

#[tokio::test]
async fn test_invoke_by_name() {
    let registry = Registry::new();
    registry.register(EchoTool).await;

    let out = registry
        .invoke("echo", serde_json::json!({"message": "hi"}))
        .await;
    assert_eq!(out, "hi");

    let missing = registry.invoke("nope", serde_json::json!({})).await;
    let parsed: serde_json::Value = serde_json::from_str(&missing).unwrap();
    assert_eq!(parsed["kind"], "not_found");
    assert!(parsed["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_close_all_reports_failures() {
    let registry = Registry::new();
    let closed = Arc::new(AtomicUsize::new(0));
    registry
        .register(SessionTool { closed: closed.clone(), fail_close: false })
        .await;
    registry
        .register(SessionTool { closed: closed.clone(), fail_close: true })
        .await;

    let failures = registry.close_all().await;
    assert_eq!(closed.load(Ordering::SeqCst), 2);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "session_b");
}

#[tokio::test]
async fn test_clone_shares_state() {
    let registry = Registry::new();
    let clone = registry.clone();

    registry.register(EchoTool).await;
    assert_eq!(clone.count().await, 1);
}
