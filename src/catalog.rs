// ABOUTME: Catalog of known adapters and the cargo feature each one lives behind.
// ABOUTME: Builds adapters by name, failing with an install hint when compiled out.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::tool::{Registry, Tool};

/// A known adapter and whether this build includes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Integration {
    /// Tool name the adapter registers under.
    pub name: &'static str,
    /// Cargo feature that compiles it in.
    pub feature: &'static str,
    pub enabled: bool,
}

const KNOWN: &[(&str, &str, bool)] = &[
    ("airweave_search", "airweave", cfg!(feature = "airweave")),
    ("scrape_website", "scrape", cfg!(feature = "scrape")),
    ("searxng_search", "searxng", cfg!(feature = "searxng")),
    ("tavily_search", "tavily", cfg!(feature = "tavily")),
];

/// Every adapter this crate knows about, compiled in or not.
pub fn integrations() -> Vec<Integration> {
    KNOWN
        .iter()
        .map(|&(name, feature, enabled)| Integration {
            name,
            feature,
            enabled,
        })
        .collect()
}

/// Look up an integration by tool name.
pub fn integration(name: &str) -> Option<Integration> {
    integrations().into_iter().find(|i| i.name == name)
}

/// Construct the named adapter from configuration.
///
/// Fails with [`ToolError::Dependency`] when the adapter's feature is not
/// enabled, [`ToolError::NotFound`] for unknown names, or whatever
/// configuration error the adapter's constructor reports.
pub fn build(name: &str, config: &ToolConfig) -> Result<Arc<dyn Tool>, ToolError> {
    let integration = integration(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
    if !integration.enabled {
        return Err(ToolError::Dependency {
            adapter: integration.name.to_string(),
            feature: integration.feature.to_string(),
        });
    }
    construct(integration.name, config)
}

#[allow(unused_variables)]
fn construct(name: &str, config: &ToolConfig) -> Result<Arc<dyn Tool>, ToolError> {
    match name {
        #[cfg(feature = "airweave")]
        "airweave_search" => Ok(Arc::new(crate::tools::AirweaveSearchTool::from_config(
            config,
        )?)),
        #[cfg(feature = "scrape")]
        "scrape_website" => Ok(Arc::new(crate::tools::ScrapeWebsiteTool::from_config(
            config,
        )?)),
        #[cfg(feature = "searxng")]
        "searxng_search" => Ok(Arc::new(crate::tools::SearxngSearchTool::from_config(
            config,
        )?)),
        #[cfg(feature = "tavily")]
        "tavily_search" => Ok(Arc::new(crate::tools::TavilySearchTool::from_config(
            config,
        )?)),
        other => Err(ToolError::NotFound(other.to_string())),
    }
}

/// Register every adapter that can be built from `config`.
///
/// Returns the adapters that were skipped and why; a missing credential
/// for one adapter never prevents the others from registering.
pub async fn register_all(registry: &Registry, config: &ToolConfig) -> Vec<(String, ToolError)> {
    let mut skipped = Vec::new();
    for integration in integrations() {
        match build(integration.name, config) {
            Ok(tool) => registry.register_arc(tool).await,
            Err(e @ ToolError::Dependency { .. }) => {
                debug!(tool = integration.name, "adapter not compiled in");
                skipped.push((integration.name.to_string(), e));
            }
            Err(e) => {
                warn!(tool = integration.name, error = %e, "skipping adapter");
                skipped.push((integration.name.to_string(), e));
            }
        }
    }
    skipped
}
