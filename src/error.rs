// ABOUTME: Defines the error type shared by every tool adapter using thiserror.
// ABOUTME: Each variant maps onto one kind in the tool failure taxonomy.

use serde::Serialize;

/// Errors from tool construction and invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(
        "Adapter '{adapter}' is not available: enable the `{feature}` feature \
         (cargo add crewtools --features {feature})"
    )]
    Dependency { adapter: String, feature: String },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}

/// The reporting category of a [`ToolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Configuration,
    Validation,
    Dependency,
    Upstream,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Dependency => "dependency",
            Self::Upstream => "upstream",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToolError {
    /// Shorthand for a missing or malformed parameter.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    /// Shorthand for a configuration failure.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The category this error is reported under. Timeouts and API
    /// failures are both upstream failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidParams(_) => ErrorKind::Validation,
            Self::Dependency { .. } => ErrorKind::Dependency,
            Self::Upstream(_) | Self::Api { .. } | Self::Timeout(_) | Self::Json(_) => {
                ErrorKind::Upstream
            }
            Self::Execution(_) => ErrorKind::Internal,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Upstream(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL may carry credentials in its query string.
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Upstream(err.to_string())
        }
    }
}
