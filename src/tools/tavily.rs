// ABOUTME: TavilySearchTool - web search through the Tavily Search API.
// ABOUTME: Returns the API response as pretty-printed JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{DEFAULT_TIMEOUT, check_status, endpoint, http_client};
use crate::config::{Secret, ToolConfig};
use crate::credentials::CredentialSpec;
use crate::error::ToolError;
use crate::normalize;
use crate::retry::RetryPolicy;
use crate::tool::{EnvVar, Tool, ToolResult};

const API_KEY: CredentialSpec = CredentialSpec::new("TAVILY_API_KEY");
const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Request body sent to `POST /search`.
#[derive(Debug, Deserialize, Serialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_depth")]
    search_depth: String,
    #[serde(default = "default_topic")]
    topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_range: Option<String>,
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_max_results")]
    max_results: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exclude_domains: Vec<String>,
    #[serde(default = "default_include_answer")]
    include_answer: serde_json::Value,
    #[serde(default)]
    include_raw_content: bool,
    #[serde(default)]
    include_images: bool,
}

fn default_depth() -> String {
    "basic".to_string()
}

fn default_topic() -> String {
    "general".to_string()
}

fn default_days() -> u32 {
    7
}

fn default_max_results() -> u32 {
    5
}

fn default_include_answer() -> serde_json::Value {
    serde_json::Value::Bool(false)
}

/// Tool for searching the web with Tavily.
pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: Secret,
    base_url: String,
    retry: RetryPolicy,
}

impl TavilySearchTool {
    /// Create from configuration; `TAVILY_API_KEY` must be set.
    pub fn from_config(config: &ToolConfig) -> Result<Self, ToolError> {
        Self::new(None, config)
    }

    /// Create with an explicit key, falling back to configuration.
    pub fn new(api_key: Option<&str>, config: &ToolConfig) -> Result<Self, ToolError> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            api_key: API_KEY.resolve(api_key, config)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::none(),
        })
    }

    /// Point at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a custom reqwest client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Retry transient failures with the given policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn search(&self, request: &SearchRequest) -> Result<serde_json::Value, ToolError> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "search"))
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        "tavily_search"
    }

    fn description(&self) -> &str {
        "A tool that performs web searches using the Tavily Search API. \
         It returns a JSON object containing the search results."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query string.",
                    "minLength": 1
                },
                "search_depth": {
                    "type": "string",
                    "description": "The depth of the search.",
                    "enum": ["basic", "advanced"],
                    "default": "basic"
                },
                "topic": {
                    "type": "string",
                    "description": "The topic to focus the search on.",
                    "enum": ["general", "news", "finance"],
                    "default": "general"
                },
                "time_range": {
                    "type": "string",
                    "description": "The time range for the search.",
                    "enum": ["day", "week", "month", "year"]
                },
                "days": {
                    "type": "integer",
                    "description": "The number of days to search back.",
                    "minimum": 1,
                    "default": 7
                },
                "max_results": {
                    "type": "integer",
                    "description": "The maximum number of results to return.",
                    "minimum": 1,
                    "maximum": 20,
                    "default": 5
                },
                "include_domains": {
                    "type": "array",
                    "description": "A list of domains to include in the search.",
                    "items": { "type": "string" }
                },
                "exclude_domains": {
                    "type": "array",
                    "description": "A list of domains to exclude from the search.",
                    "items": { "type": "string" }
                },
                "include_answer": {
                    "type": ["boolean", "string"],
                    "description": "Whether to include a direct answer to the query ('basic' or 'advanced' for a specific answer depth).",
                    "default": false
                },
                "include_raw_content": {
                    "type": "boolean",
                    "description": "Whether to include the raw content of the search results.",
                    "default": false
                },
                "include_images": {
                    "type": "boolean",
                    "description": "Whether to include images in the search results.",
                    "default": false
                }
            },
            "required": ["query"]
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        vec![EnvVar::required(API_KEY.env_var, "API key for Tavily search service")]
    }

    fn package_dependencies(&self) -> Vec<String> {
        vec!["tavily".to_string()]
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: SearchRequest = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid(e.to_string()))?;
        if let serde_json::Value::String(depth) = &request.include_answer {
            if depth != "basic" && depth != "advanced" {
                return Err(ToolError::invalid(
                    "`include_answer` must be a boolean, \"basic\", or \"advanced\"",
                ));
            }
        }

        debug!(query = %request.query, depth = %request.search_depth, "tavily search");
        let body = self
            .retry
            .run("tavily_search", || self.search(&request))
            .await
            .map_err(|e| match e {
                ToolError::Api { status, message } => ToolError::Api {
                    status,
                    message: normalize::redact(&message, &[&self.api_key]),
                },
                other => other,
            })?;

        ToolResult::json(&body)
    }
}
