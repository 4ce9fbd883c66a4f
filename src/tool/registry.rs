// ABOUTME: Implements the Registry - a thread-safe container for discovering
// ABOUTME: and invoking registered tools by name at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{Tool, ToolDescriptor, ToolExt};
use crate::error::ToolError;
use crate::normalize;

/// A thread-safe registry of tools.
#[derive(Default)]
pub struct Registry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A later registration under the same name replaces the earlier one.
    pub async fn register<T: Tool + 'static>(&self, tool: T) {
        self.register_arc(Arc::new(tool)).await;
    }

    /// Register a tool from an Arc.
    pub async fn register_arc(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        if tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "replaced existing tool registration");
        } else {
            info!(tool = %name, "registered tool");
        }
    }

    /// Unregister a tool by name.
    pub async fn unregister(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let mut tools = self.tools.write().await;
        tools.remove(name)
    }

    /// Get a tool by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// List all tool names, sorted alphabetically.
    pub async fn list(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<_> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// List tool names matching a glob pattern, sorted alphabetically.
    pub async fn matching(&self, pattern: &str) -> Result<Vec<String>, ToolError> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| ToolError::invalid(format!("invalid tool pattern: {}", e)))?;
        let mut names = self.list().await;
        names.retain(|name| pattern.matches(name));
        Ok(names)
    }

    /// Get all registered tools.
    pub async fn all(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.values().cloned().collect()
    }

    /// Get the number of registered tools.
    pub async fn count(&self) -> usize {
        let tools = self.tools.read().await;
        tools.len()
    }

    /// Descriptors for every registered tool, sorted by name.
    pub async fn descriptors(&self) -> Vec<ToolDescriptor> {
        let tools = self.tools.read().await;
        let mut descriptors: Vec<_> = tools.values().map(|t| t.describe()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Tool specs in the exported `tool.specs.json` layout.
    pub async fn specs(&self) -> serde_json::Value {
        let specs: Vec<_> = self
            .descriptors()
            .await
            .into_iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "description": d.description.trim(),
                    "run_params": d.run_params(),
                    "env_vars": d.env_vars,
                    "package_dependencies": d.package_dependencies,
                })
            })
            .collect();
        serde_json::Value::Array(specs)
    }

    /// Invoke a tool by name. Unknown names come back as an error envelope.
    pub async fn invoke(&self, name: &str, params: serde_json::Value) -> String {
        match self.get(name).await {
            Some(tool) => tool.invoke(params).await,
            None => normalize::error_envelope(&ToolError::NotFound(name.to_string())),
        }
    }

    /// Close every registered tool, returning the failures by tool name.
    pub async fn close_all(&self) -> Vec<(String, ToolError)> {
        let tools = self.all().await;
        let results = futures::future::join_all(tools.iter().map(|tool| async move {
            (tool.name().to_string(), tool.close().await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|e| (name, e)))
            .inspect(|(name, e)| warn!(tool = %name, error = %e, "failed to close tool"))
            .collect()
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            tools: Arc::clone(&self.tools),
        }
    }
}
