// ABOUTME: Validates invocation arguments against a tool's declared JSON Schema.
// ABOUTME: Compiles the schema with jsonschema and names the offending field.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Check `params` against `schema`, reporting every violation found.
///
/// A `null` argument counts as absent, so optional fields may be passed as
/// `null` and a `null` required field is reported as missing.
pub fn validate(schema: &Value, params: &Value) -> Result<(), ToolError> {
    let params = match params {
        Value::Null | Value::Object(_) => drop_nulls(params.clone()),
        other => {
            return Err(ToolError::invalid(format!(
                "arguments must be an object, got {}",
                type_name(other)
            )));
        }
    };

    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|e| {
            ToolError::Execution(anyhow::anyhow!("tool schema does not compile: {}", e))
        })?;

    let result = compiled.validate(&params);
    if let Err(errors) = result {
        let messages: Vec<String> = errors.map(|e| describe(&e)).collect();
        return Err(ToolError::invalid(messages.join("; ")));
    }
    Ok(())
}

/// Remove `null` members from objects, at every depth. A bare `null`
/// becomes an empty object.
pub(crate) fn drop_nulls(params: Value) -> Value {
    match params {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, drop_nulls(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

fn describe(error: &ValidationError<'_>) -> String {
    let path = field_path(&error.instance_path.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string());
            format!("missing required field `{}`", join(&path, &name))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|name| format!("unexpected field `{}`", join(&path, name)))
            .collect::<Vec<_>>()
            .join("; "),
        _ if path.is_empty() => format!("arguments: {}", error),
        _ => format!("`{}`: {}", path, error),
    }
}

/// Render a JSON pointer such as `/filter/domains/1` as `filter.domains[1]`.
fn field_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.parse::<usize>().is_ok() {
            path.push_str(&format!("[{}]", segment));
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
