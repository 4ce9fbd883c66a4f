// ABOUTME: Defines ToolResult - the structured outcome of one adapter call
// ABOUTME: before it is flattened into the agent-facing string.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ToolError;
use crate::normalize;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The output content handed to the agent.
    pub content: String,

    /// Whether the upstream service reported a failure.
    pub is_error: bool,

    /// Details about the call kept out of the agent-facing string.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            metadata: HashMap::new(),
        }
    }

    /// Create a successful result holding pretty-printed JSON.
    pub fn json(value: &impl Serialize) -> Result<Self, ToolError> {
        Ok(Self::text(normalize::json_output(value)?))
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }

    /// Collapse into the string contract, treating error results as upstream failures.
    pub fn into_output(self) -> Result<String, ToolError> {
        if self.is_error {
            Err(ToolError::Upstream(self.content))
        } else {
            Ok(self.content)
        }
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text("")
    }
}
