// ABOUTME: Response normalization - turns upstream payloads and failures into
// ABOUTME: the single string handed back to the agent.

use serde::Serialize;

use crate::config::Secret;
use crate::error::ToolError;

/// Serialize a success payload as pretty JSON.
pub fn json_output(value: &impl Serialize) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a failure as `{"error": <message>, "kind": <kind>}`.
pub fn error_envelope(err: &ToolError) -> String {
    serde_json::json!({
        "error": err.to_string(),
        "kind": err.kind(),
    })
    .to_string()
}

/// The notice appended to content cut by [`truncate_with_notice`].
pub fn truncation_notice(max_chars: usize, total_chars: usize) -> String {
    format!(
        "\n\n[Content truncated at {} characters, total {} characters]",
        max_chars, total_chars
    )
}

/// Cap `content` at `max_chars` characters, appending an explicit notice
/// when anything was cut. Content within the limit is returned unchanged.
pub fn truncate_with_notice(content: &str, max_chars: usize) -> String {
    match char_boundary(content, max_chars) {
        Some(cut) => {
            let total = content.chars().count();
            format!("{}{}", &content[..cut], truncation_notice(max_chars, total))
        }
        None => content.to_string(),
    }
}

/// Cap a single result's text, marking the cut with `...`.
pub fn truncate_snippet(content: &str, max_chars: usize) -> String {
    match char_boundary(content, max_chars) {
        Some(cut) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Replace every occurrence of a secret in `message` with its masked form.
pub fn redact(message: &str, secrets: &[&Secret]) -> String {
    secrets
        .iter()
        .filter(|s| !s.expose().is_empty())
        .fold(message.to_string(), |acc, secret| {
            acc.replace(secret.expose(), &secret.masked())
        })
}

/// Byte offset of the `max_chars`-th character, or None when the content fits.
fn char_boundary(content: &str, max_chars: usize) -> Option<usize> {
    content.char_indices().nth(max_chars).map(|(i, _)| i)
}
