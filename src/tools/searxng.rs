// ABOUTME: SearxngSearchTool - web search through a self-hosted SearxNG instance.
// ABOUTME: Returns titles, URLs, and snippets as plain text blocks.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http::{DEFAULT_TIMEOUT, check_status, endpoint, http_client, validate_url};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::retry::RetryPolicy;
use crate::tool::{EnvVar, Tool, ToolResult};

const BASE_URL_VAR: &str = "SEARXNG_BASE_URL";

/// One entry in a SearxNG JSON response. Any field may be missing or `null`.
#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Tool for searching the web through SearxNG.
pub struct SearxngSearchTool {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl SearxngSearchTool {
    /// Create from configuration; `SEARXNG_BASE_URL` must be set.
    pub fn from_config(config: &ToolConfig) -> Result<Self, ToolError> {
        Self::new(config.require(BASE_URL_VAR)?)
    }

    /// Create against an explicit instance URL.
    pub fn new(base_url: &str) -> Result<Self, ToolError> {
        validate_url(base_url).map_err(|e| ToolError::config(format!("{}: {}", BASE_URL_VAR, e)))?;
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.to_string(),
            retry: RetryPolicy::none(),
        })
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

    async fn search(&self, query: &str, num_results: usize) -> Result<serde_json::Value, ToolError> {
        let limit = num_results.to_string();
        let response = self
            .client
            .get(endpoint(&self.base_url, "search"))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("engines", "general"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    fn format_results(results: &[SearxngResult]) -> String {
        results
            .iter()
            .map(|r| {
                format!(
                    "Title: {}\nURL: {}\nSnippet: {}\n",
                    r.title.as_deref().unwrap_or_default(),
                    r.url.as_deref().unwrap_or_default(),
                    r.content.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Tool for SearxngSearchTool {
    fn name(&self) -> &str {
        "searxng_search"
    }

    fn description(&self) -> &str {
        "Search the web using a SearxNG instance. Returns titles, URLs, and snippets."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to be executed",
                    "minLength": 1
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (default: 10)",
                    "minimum": 1,
                    "maximum": 50,
                    "default": 10
                }
            },
            "required": ["query"]
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        vec![EnvVar::required(BASE_URL_VAR, "Base URL of the SearxNG instance")]
    }

    fn package_dependencies(&self) -> Vec<String> {
        vec!["searxng".to_string()]
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
            #[serde(default = "default_num_results")]
            num_results: usize,
        }

        fn default_num_results() -> usize {
            10
        }

        let params: Params = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid(e.to_string()))?;

        debug!(query = %params.query, num_results = params.num_results, "searxng search");
        let body = self
            .retry
            .run("searxng_search", || self.search(&params.query, params.num_results))
            .await?;

        let Some(results) = body.get("results").filter(|r| !r.is_null()) else {
            return Ok(ToolResult::text(
                "No results found or invalid response from SearxNG instance.",
            ));
        };
        let mut results: Vec<SearxngResult> = serde_json::from_value(results.clone())?;
        results.truncate(params.num_results);

        if results.is_empty() {
            return Ok(ToolResult::text("No results found."));
        }

        Ok(ToolResult::text(Self::format_results(&results)).with_metadata("count", results.len()))
    }
}
