// ABOUTME: ToolDescriptor and EnvVar - the static metadata a tool publishes.
// ABOUTME: Used by the registry for discovery and by the spec exporter.

use serde::{Deserialize, Serialize};

/// An environment variable a tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl EnvVar {
    /// A variable that must be set before construction.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// A variable with a fallback value.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            default: default.map(str::to_string),
        }
    }
}

/// Static description of a tool: what it is called, what it does, what it
/// accepts, and what it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    #[serde(default)]
    pub package_dependencies: Vec<String>,
}

impl ToolDescriptor {
    /// Names of the environment variables that must be resolvable.
    pub fn required_env_vars(&self) -> impl Iterator<Item = &str> {
        self.env_vars
            .iter()
            .filter(|v| v.required)
            .map(|v| v.name.as_str())
    }

    /// Flatten the input schema into one entry per parameter.
    pub fn run_params(&self) -> Vec<serde_json::Value> {
        let required: Vec<&str> = self.input_schema["required"]
            .as_array()
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let Some(properties) = self.input_schema["properties"].as_object() else {
            return Vec::new();
        };

        let mut params: Vec<_> = properties
            .iter()
            .map(|(name, prop)| {
                serde_json::json!({
                    "name": name,
                    "description": prop["description"].as_str().unwrap_or(""),
                    "type": prop["type"].as_str().unwrap_or("any"),
                    "required": required.contains(&name.as_str()),
                })
            })
            .collect();
        params.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_params() {
        let descriptor = ToolDescriptor {
            name: "lookup".into(),
            description: "Look something up".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "What to look up" },
                    "limit": { "type": "integer" }
                },
                "required": ["query"]
            }),
            env_vars: vec![EnvVar::required("LOOKUP_API_KEY", "API key")],
            package_dependencies: vec![],
        };

        let params = descriptor.run_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "limit");
        assert_eq!(params[0]["required"], false);
        assert_eq!(params[1]["name"], "query");
        assert_eq!(params[1]["type"], "string");
        assert_eq!(params[1]["required"], true);

        let required: Vec<_> = descriptor.required_env_vars().collect();
        assert_eq!(required, vec!["LOOKUP_API_KEY"]);
    }
}
