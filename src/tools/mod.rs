// ABOUTME: Adapters wrapping external services behind the Tool contract.
// ABOUTME: Each adapter is compiled in only when its cargo feature is enabled.

mod http;

#[cfg(feature = "airweave")]
mod airweave;
#[cfg(feature = "scrape")]
mod scrape_website;
#[cfg(feature = "searxng")]
mod searxng;
#[cfg(feature = "tavily")]
mod tavily;

pub use http::{check_status, http_client, validate_url};

#[cfg(feature = "airweave")]
pub use airweave::{AirweaveSearchTool, SearchHit};
#[cfg(feature = "scrape")]
pub use scrape_website::ScrapeWebsiteTool;
#[cfg(feature = "searxng")]
pub use searxng::SearxngSearchTool;
#[cfg(feature = "tavily")]
pub use tavily::TavilySearchTool;
