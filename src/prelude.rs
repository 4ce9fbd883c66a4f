// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use crewtools::prelude::*;` to get started quickly.

pub use crate::catalog::{Integration, integrations};
pub use crate::config::{Secret, ToolConfig};
pub use crate::credentials::CredentialSpec;
pub use crate::error::{ErrorKind, ToolError};
pub use crate::retry::RetryPolicy;
pub use crate::tool::{EnvVar, Registry, Tool, ToolDescriptor, ToolExt, ToolResult};

#[cfg(feature = "airweave")]
pub use crate::tools::{AirweaveSearchTool, SearchHit};
#[cfg(feature = "scrape")]
pub use crate::tools::ScrapeWebsiteTool;
#[cfg(feature = "searxng")]
pub use crate::tools::SearxngSearchTool;
#[cfg(feature = "tavily")]
pub use crate::tools::TavilySearchTool;
