// ABOUTME: ToolConfig - the one place the process environment is read.
// ABOUTME: Adapters receive this snapshot instead of touching std::env.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ToolError;

/// A credential whose formatted forms never reveal the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for building requests only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last four characters with the middle starred out;
    /// values of eight characters or fewer are starred out entirely.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret({})", self.masked())
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Configuration values available to tool constructors.
///
/// Populated once at process start, usually with [`ToolConfig::from_env`],
/// and passed by reference into every adapter. Tests build one from pairs.
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    values: HashMap<String, String>,
}

impl ToolConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    /// Build from explicit key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Layer the entries of a `.env` file over this configuration.
    ///
    /// The process environment is left untouched.
    pub fn with_dotenv(mut self, path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            ToolError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                ToolError::config(format!("failed to parse {}: {}", path.display(), e))
            })?;
            self.values.insert(key, value);
        }
        Ok(self)
    }

    /// Set a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`ToolConfig::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a value. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up a value, failing with a message that names the variable.
    pub fn require(&self, key: &str) -> Result<&str, ToolError> {
        self.get(key)
            .ok_or_else(|| ToolError::config(format!("missing configuration: set {}", key)))
    }
}
