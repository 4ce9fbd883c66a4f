// ABOUTME: Credential resolution - explicit argument, then configuration,
// ABOUTME: then a configuration error that names the missing variable.

use crate::config::{Secret, ToolConfig};
use crate::error::ToolError;

/// How an adapter's API key is found and sanity-checked.
#[derive(Debug, Clone)]
pub struct CredentialSpec {
    /// Environment variable holding the key.
    pub env_var: &'static str,
    /// Reject keys shorter than this.
    pub min_length: usize,
    /// Reject keys that do not start with this.
    pub key_prefix: Option<&'static str>,
}

impl CredentialSpec {
    pub const fn new(env_var: &'static str) -> Self {
        Self {
            env_var,
            min_length: 0,
            key_prefix: None,
        }
    }

    pub const fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub const fn prefix(mut self, prefix: &'static str) -> Self {
        self.key_prefix = Some(prefix);
        self
    }

    /// Resolve the key. An explicit, non-empty argument wins over the
    /// configured value; neither being present is a configuration error.
    pub fn resolve(&self, explicit: Option<&str>, config: &ToolConfig) -> Result<Secret, ToolError> {
        let value = explicit
            .filter(|v| !v.is_empty())
            .or_else(|| config.get(self.env_var))
            .ok_or_else(|| {
                ToolError::config(format!("missing API key: set {}", self.env_var))
            })?;

        if value.chars().count() < self.min_length {
            return Err(ToolError::config(format!(
                "API key length below minimum requirement; check your {} configuration",
                self.env_var
            )));
        }

        if let Some(prefix) = self.key_prefix {
            if !value.starts_with(prefix) {
                return Err(ToolError::config(format!(
                    "invalid API key format; check your {} configuration",
                    self.env_var
                )));
            }
        }

        Ok(Secret::new(value))
    }
}
