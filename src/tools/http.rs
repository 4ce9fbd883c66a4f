// ABOUTME: HTTP plumbing shared by adapters - client construction, status
// ABOUTME: checks that keep the upstream message, and URL validation.

use std::time::Duration;

use url::Url;

use crate::error::ToolError;

/// Default per-request deadline, enforced by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("crewtools/", env!("CARGO_PKG_VERSION"));

/// Build the client adapters use unless one is supplied.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ToolError::config(format!("failed to create HTTP client: {}", e)))
}

/// Turn a non-success response into [`ToolError::Api`], keeping a short
/// excerpt of the body so the agent can see what the service said.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ToolError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|k| v[*k].as_str().map(str::to_string))
        })
        .unwrap_or(body);

    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = if detail.trim().is_empty() {
        reason.to_string()
    } else {
        format!("{}: {}", reason, crate::normalize::truncate_snippet(detail.trim(), 200))
    };

    Err(ToolError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_url(raw: &str) -> Result<Url, ToolError> {
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(ToolError::invalid(
            "invalid URL: must start with 'http://' or 'https://'",
        ));
    }
    let url = Url::parse(raw).map_err(|e| ToolError::invalid(format!("invalid URL: {}", e)))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ToolError::invalid("invalid URL: must contain a valid domain"));
    }
    Ok(url)
}

/// Join a path onto a configured base URL, tolerating trailing slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
