// ABOUTME: Defines the Tool trait - the contract every adapter satisfies.
// ABOUTME: Tools have a name, description, schema, requirements, and async execute.

use async_trait::async_trait;

use super::{EnvVar, ToolDescriptor, ToolResult};
use crate::error::ToolError;

/// A tool that can be invoked by an agent runtime.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a natural-language description for the agent's planner.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Environment variables this tool may read at construction.
    fn env_vars(&self) -> Vec<EnvVar> {
        Vec::new()
    }

    /// Cargo features this tool needs compiled in.
    fn package_dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Static metadata for registration and discovery.
    fn describe(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema(),
            env_vars: self.env_vars(),
            package_dependencies: self.package_dependencies(),
        }
    }

    /// Execute the tool with already-validated parameters.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Release any long-lived remote resource held by this tool.
    async fn close(&self) -> Result<(), ToolError> {
        Ok(())
    }
}
