// ABOUTME: AirweaveSearchTool - semantic search over an Airweave collection.
// ABOUTME: Filters hits by similarity score and renders them as numbered text blocks.

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

const API_KEY: CredentialSpec = CredentialSpec::new("AIRWEAVE_API_KEY");
const COLLECTION_VAR: &str = "AIRWEAVE_COLLECTION_ID";
const BASE_URL_VAR: &str = "AIRWEAVE_BASE_URL";
const DEFAULT_BASE_URL: &str = "https://api.airweave.ai";
const DEFAULT_MAX_CONTENT_LENGTH: usize = 300;

const NO_RESULTS: &str = "No results found for your query.";
const NO_RELEVANT_RESULTS: &str =
    "Search completed but no sufficiently relevant results were found. Try rephrasing your query.";
const NO_COMPLETION: &str =
    "Unable to generate an answer from available data. Try rephrasing your question.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseType {
    #[default]
    Raw,
    Completion,
}

#[derive(Debug, Deserialize)]
struct Params {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    response_type: ResponseType,
    #[serde(default = "default_recency_bias")]
    recency_bias: f64,
    similarity_threshold: Option<f64>,
}

fn default_limit() -> usize {
    10
}

fn default_recency_bias() -> f64 {
    0.3
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    response_type: ResponseType,
    recency_bias: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Vec<serde_json::Value>,
    #[serde(default)]
    completion: Option<String>,
}

/// One search result, flattened from the backend's result and payload fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: f64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub entity_id: Option<String>,
    pub created_at: Option<String>,
    pub url: Option<String>,
}

impl SearchHit {
    /// Read a hit from a raw result. Fields are looked up in the nested
    /// `payload` object first, then on the result itself.
    fn from_value(value: &serde_json::Value) -> Self {
        let payload = value.get("payload");
        let field = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                payload
                    .and_then(|p| p.get(*key))
                    .or_else(|| value.get(*key))
                    .and_then(|v| match v {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Null => None,
                        other => Some(other.to_string()),
                    })
            })
        };

        Self {
            score: value.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0),
            title: field(&["title", "name"]),
            content: field(&["md_content", "content"]),
            source: field(&["source_name", "source"]),
            entity_id: field(&["entity_id"]),
            created_at: field(&["created_at"]),
            url: field(&["url"]),
        }
    }

    fn render(&self, index: usize, max_content_length: usize) -> String {
        let mut lines = vec![format!("\n--- Result {} (Score: {:.3}) ---", index, self.score)];
        if let Some(title) = &self.title {
            lines.push(format!("Title: {}", title));
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!(
                "Content: {}",
                normalize::truncate_snippet(content, max_content_length)
            ));
        }
        if let Some(source) = &self.source {
            lines.push(format!("Source: {}", source));
        }
        if let Some(entity_id) = &self.entity_id {
            lines.push(format!("Entity ID: {}", entity_id));
        }
        if let Some(created_at) = &self.created_at {
            lines.push(format!("Created: {}", created_at));
        }
        if let Some(url) = &self.url {
            lines.push(format!("URL: {}", url));
        }
        lines.join("\n")
    }
}

/// Keep hits scoring at or above `threshold`, in backend order, at most `limit`.
fn select_hits(results: &[serde_json::Value], threshold: Option<f64>, limit: usize) -> Vec<SearchHit> {
    results
        .iter()
        .map(SearchHit::from_value)
        .filter(|hit| threshold.is_none_or(|t| hit.score >= t))
        .take(limit)
        .collect()
}

/// Tool for searching an Airweave collection.
pub struct AirweaveSearchTool {
    client: reqwest::Client,
    api_key: Secret,
    collection_id: String,
    base_url: String,
    max_content_length: usize,
    retry: RetryPolicy,
}

impl AirweaveSearchTool {
    /// Create from configuration; `AIRWEAVE_API_KEY` and `AIRWEAVE_COLLECTION_ID`
    /// must be set. `AIRWEAVE_BASE_URL` overrides the API host.
    pub fn from_config(config: &ToolConfig) -> Result<Self, ToolError> {
        let tool = Self::new(config.require(COLLECTION_VAR)?, None, config)?;
        Ok(match config.get(BASE_URL_VAR) {
            Some(base_url) => tool.with_base_url(base_url),
            None => tool,
        })
    }

    /// Create for one collection with an explicit key, falling back to configuration.
    pub fn new(
        collection_id: impl Into<String>,
        api_key: Option<&str>,
        config: &ToolConfig,
    ) -> Result<Self, ToolError> {
        let collection_id = collection_id.into();
        if collection_id.trim().is_empty() {
            return Err(ToolError::config("collection_id must not be empty"));
        }
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            api_key: API_KEY.resolve(api_key, config)?,
            collection_id,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            retry: RetryPolicy::none(),
        })
    }

    /// Point at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cap each result's content at this many characters.
    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
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

    async fn search(&self, request: &SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
        let path = format!("collections/{}/search", self.collection_id);
        let response = self
            .client
            .post(endpoint(&self.base_url, &path))
            .header("x-api-key", self.api_key.expose())
            .json(request)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    fn format_hits(&self, hits: &[SearchHit]) -> String {
        let mut out = format!("Found {} result(s):\n", hits.len());
        for (i, hit) in hits.iter().enumerate() {
            out.push('\n');
            out.push_str(&hit.render(i + 1, self.max_content_length));
        }
        out
    }
}

#[async_trait]
impl Tool for AirweaveSearchTool {
    fn name(&self) -> &str {
        "airweave_search"
    }

    fn description(&self) -> &str {
        "Search across all connected data sources in an Airweave collection. \
         Supports both raw search results and AI-generated answers via the response_type parameter."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant information",
                    "minLength": 1
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (1-100)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": 10
                },
                "offset": {
                    "type": "integer",
                    "description": "Number of results to skip for pagination",
                    "minimum": 0,
                    "default": 0
                },
                "response_type": {
                    "type": "string",
                    "description": "'raw' for search results or 'completion' for an AI-generated answer",
                    "enum": ["raw", "completion"],
                    "default": "raw"
                },
                "recency_bias": {
                    "type": "number",
                    "description": "Weight for recent results (0.0 = no bias, 1.0 = only recency)",
                    "minimum": 0.0,
                    "maximum": 1.0,
                    "default": 0.3
                },
                "similarity_threshold": {
                    "type": "number",
                    "description": "Minimum similarity score a result needs to be included (0.0-1.0)",
                    "minimum": 0.0,
                    "maximum": 1.0
                }
            },
            "required": ["query"]
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        vec![
            EnvVar::required(API_KEY.env_var, "API key for Airweave"),
            EnvVar::optional(BASE_URL_VAR, "Custom Airweave API base URL", Some(DEFAULT_BASE_URL)),
        ]
    }

    fn package_dependencies(&self) -> Vec<String> {
        vec!["airweave".to_string()]
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: Params = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid(e.to_string()))?;

        let request = SearchRequest {
            query: &params.query,
            limit: params.limit,
            offset: (params.offset > 0).then_some(params.offset),
            response_type: params.response_type,
            recency_bias: params.recency_bias,
            score_threshold: params.similarity_threshold,
        };

        debug!(
            collection = %self.collection_id,
            query = %params.query,
            limit = params.limit,
            "airweave search"
        );
        let response = self
            .retry
            .run("airweave_search", || self.search(&request))
            .await
            .map_err(|e| match e {
                ToolError::Api { status, message } => ToolError::Api {
                    status,
                    message: normalize::redact(&message, &[&self.api_key]),
                },
                other => other,
            })?;

        if params.response_type == ResponseType::Completion {
            let answer = response
                .completion
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| NO_COMPLETION.to_string());
            return Ok(ToolResult::text(answer));
        }

        match response.status.as_deref() {
            Some("no_results") => return Ok(ToolResult::text(NO_RESULTS)),
            Some("no_relevant_results") => return Ok(ToolResult::text(NO_RELEVANT_RESULTS)),
            _ => {}
        }
        if response.results.is_empty() {
            return Ok(ToolResult::text(NO_RESULTS));
        }

        let hits = select_hits(&response.results, params.similarity_threshold, params.limit);
        if hits.is_empty() {
            return Ok(ToolResult::text(NO_RELEVANT_RESULTS)
                .with_metadata("filtered", response.results.len()));
        }

        Ok(ToolResult::text(self.format_hits(&hits))
            .with_metadata("count", hits.len())
            .with_metadata("filtered", response.results.len() - hits.len()))
    }
}
