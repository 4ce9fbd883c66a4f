// ABOUTME: ScrapeWebsiteTool - fetches a page and returns its readable text.
// ABOUTME: Output is capped to a token budget with an explicit truncation notice.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tiktoken_rs::CoreBPE;
use tracing::{debug, warn};

use super::http::{DEFAULT_TIMEOUT, check_status, validate_url};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::normalize;
use crate::tool::{EnvVar, Tool, ToolResult};

/// Default budget: 75% of the smallest common model context window.
const DEFAULT_MAX_TOKENS: usize = 8000;

/// Characters per token when no tokenizer is available.
const CHARS_PER_TOKEN: usize = 4;

/// Line width handed to html2text; wide enough that paragraphs are not wrapped.
const TEXT_WIDTH: usize = 10_000;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

static ENCODER: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        warn!(error = %e, "tokenizer unavailable, approximating token counts");
        None
    }
});

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)\s*>")
        .expect("static regex")
});
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|tr|section|article)\s*>|<br\s*/?>").expect("static regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("static regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("static regex"));

/// Tool for reading the text content of a web page.
pub struct ScrapeWebsiteTool {
    client: reqwest::Client,
    website_url: Option<String>,
    description: String,
    max_tokens: usize,
}

impl ScrapeWebsiteTool {
    /// Create a tool that accepts any URL per call.
    pub fn new() -> Result<Self, ToolError> {
        Ok(Self {
            client: Self::build_client(None)?,
            website_url: None,
            description: "A tool that can be used to read a website content.".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create from configuration. No credentials are needed.
    pub fn from_config(_config: &ToolConfig) -> Result<Self, ToolError> {
        Self::new()
    }

    /// Create a tool bound to one URL; calls then need no arguments.
    pub fn for_url(website_url: &str) -> Result<Self, ToolError> {
        validate_url(website_url)?;
        Ok(Self {
            website_url: Some(website_url.to_string()),
            description: format!("A tool that can be used to read {}'s content.", website_url),
            ..Self::new()?
        })
    }

    /// Send a cookie whose value is read from configuration.
    pub fn with_cookie(
        mut self,
        name: &str,
        value_var: &str,
        config: &ToolConfig,
    ) -> Result<Self, ToolError> {
        let value = config.require(value_var)?;
        self.client = Self::build_client(Some(format!("{}={}", name, value)))?;
        Ok(self)
    }

    /// Change the default token budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    /// Use a custom reqwest client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_client(cookie: Option<String>) -> Result<reqwest::Client, ToolError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        if let Some(cookie) = cookie {
            let mut value = HeaderValue::from_str(&cookie)
                .map_err(|_| ToolError::config("cookie value is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ToolError::config(format!("failed to create HTTP client: {}", e)))
    }

    /// Extract readable text. Scripts and styles are dropped first, then
    /// html2text renders the page; the regex stripper is the fallback.
    pub(crate) fn html_to_text(html: &str) -> String {
        let html = SCRIPT_OR_STYLE.replace_all(html, " ");
        let text = match html2text::from_read(html.as_bytes(), TEXT_WIDTH) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => Self::strip_tags(&html),
            Err(e) => {
                debug!(error = %e, "html2text failed, stripping tags");
                Self::strip_tags(&html)
            }
        };

        let text = SPACES.replace_all(&text, " ");
        let text = BLANK_LINES.replace_all(&text, "\n");
        text.trim().to_string()
    }

    fn strip_tags(html: &str) -> String {
        let text = BLOCK_END.replace_all(html, "\n");
        let text = TAG.replace_all(&text, " ");
        let text = NUMERIC_ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| {
            let digits = &caps[1];
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => digits.parse().ok(),
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        });
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    /// Token count under the cl100k encoding, or chars/4 without a tokenizer.
    fn count_tokens(text: &str) -> usize {
        match ENCODER.as_ref() {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.chars().count() / CHARS_PER_TOKEN,
        }
    }

    /// Fit `text` into `max_tokens`. Over-budget text is cut at the same
    /// fraction of its characters as the budget is of its tokens.
    fn fit_to_budget(text: &str, max_tokens: usize) -> Budgeted {
        let tokens = Self::count_tokens(text);
        let chars = text.chars().count();
        if tokens <= max_tokens {
            return Budgeted {
                content: text.to_string(),
                tokens,
                truncated: false,
            };
        }
        let char_limit = chars * max_tokens / tokens;
        Budgeted {
            content: normalize::truncate_with_notice(text, char_limit),
            tokens,
            truncated: char_limit < chars,
        }
    }
}

struct Budgeted {
    content: String,
    tokens: usize,
    truncated: bool,
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        "scrape_website"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> serde_json::Value {
        let mut schema = serde_json::json!({
            "type": "object",
            "properties": {
                "website_url": {
                    "type": "string",
                    "description": "Mandatory website url to read the file"
                },
                "max_tokens": {
                    "type": "integer",
                    "description": "Maximum number of tokens of content to return",
                    "minimum": 1
                }
            },
            "required": ["website_url"]
        });
        if self.website_url.is_some() {
            if let Some(properties) = schema["properties"].as_object_mut() {
                properties.remove("website_url");
            }
            schema["required"] = serde_json::json!([]);
        }
        schema
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        Vec::new()
    }

    fn package_dependencies(&self) -> Vec<String> {
        vec!["scrape".to_string()]
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            website_url: Option<String>,
            max_tokens: Option<usize>,
        }

        let params: Params = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid(e.to_string()))?;

        let url = params
            .website_url
            .or_else(|| self.website_url.clone())
            .ok_or_else(|| ToolError::invalid("missing required field `website_url`"))?;
        let url = validate_url(&url)?;
        let max_tokens = params.max_tokens.unwrap_or(self.max_tokens).max(1);

        debug!(url = %url, max_tokens, "scraping website");
        let response = check_status(self.client.get(url).send().await?).await?;
        let html = response.text().await?;
        let text = Self::html_to_text(&html);

        let budgeted = Self::fit_to_budget(&text, max_tokens);
        Ok(ToolResult::text(budgeted.content)
            .with_metadata("tokens", budgeted.tokens)
            .with_metadata("truncated", budgeted.truncated))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tool::ToolExt;

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(
            format!("<html><head><style>p {{ color: red }}</style></head><body>{}</body></html>", body),
            "text/html",
        )
    }

    #[test]
    fn test_html_to_text() {
        let html = "<html><body><h1>Title</h1><p>Hello <b>world</b>!</p></body></html>";
        let text = ScrapeWebsiteTool::html_to_text(html);
        assert!(text.contains("Title"));
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_to_text_strips_scripts() {
        let html = "<html><SCRIPT type=\"x\">alert('xss')</SCRIPT><body>Content</body></html>";
        let text = ScrapeWebsiteTool::html_to_text(html);
        assert_eq!(text, "Content");
    }

    #[test]
    fn test_html_entities() {
        let text = ScrapeWebsiteTool::html_to_text(
            "<p>&lt;tag&gt; &amp;amp; it&#8217;s &#x27;quoted&#x27;</p>",
        );
        assert!(text.contains("<tag>"));
        assert!(text.contains("&amp;"));
        assert!(text.contains("it\u{2019}s"));
        assert!(text.contains("'quoted'"));
        assert!(!text.contains("&#"));
    }

    #[test]
    fn test_strip_tags_decodes_numeric_entities() {
        let text = ScrapeWebsiteTool::strip_tags("<p>it&#8217;s &#x27;ok&#X27; &#xD800;</p>");
        assert_eq!(text.trim(), "it\u{2019}s 'ok' &#xD800;");
    }

    #[test]
    fn test_budget_leaves_short_text_alone() {
        let fitted = ScrapeWebsiteTool::fit_to_budget("a short page", 100);
        assert_eq!(fitted.content, "a short page");
        assert!(!fitted.truncated);
        assert!(fitted.tokens <= 100);
    }

    #[test]
    fn test_budget_cut_matches_reported_flag() {
        let text = "word ".repeat(200).trim_end().to_string();
        let tokens = ScrapeWebsiteTool::count_tokens(&text);
        assert!(tokens > 10);

        let fitted = ScrapeWebsiteTool::fit_to_budget(&text, 10);
        let limit = text.chars().count() * 10 / tokens;
        assert!(fitted.truncated);
        assert_eq!(fitted.tokens, tokens);
        assert_eq!(
            fitted.content,
            format!(
                "{}{}",
                &text[..limit],
                normalize::truncation_notice(limit, text.chars().count())
            )
        );
    }

    #[test]
    fn test_fixed_url_schema() {
        let tool = ScrapeWebsiteTool::for_url("https://example.com").unwrap();
        assert_eq!(
            tool.description(),
            "A tool that can be used to read https://example.com's content."
        );
        let schema = tool.schema();
        assert!(schema["properties"].get("website_url").is_none());
        assert!(ScrapeWebsiteTool::for_url("example.com").is_err());
    }

    #[test]
    fn test_cookie_needs_config() {
        let err = ScrapeWebsiteTool::new()
            .unwrap()
            .with_cookie("session", "SITE_SESSION", &ToolConfig::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("SITE_SESSION"));
    }

    #[tokio::test]
    async fn test_small_page_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(html_page("<p>Short page</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let out = ScrapeWebsiteTool::new()
            .unwrap()
            .invoke(json!({"website_url": format!("{}/page", server.uri())}))
            .await;
        assert_eq!(out, "Short page");
    }

    #[tokio::test]
    async fn test_large_page_truncated_with_notice() {
        let server = MockServer::start().await;
        let body = format!("<p>{}</p>", "word ".repeat(200));
        Mock::given(method("GET"))
            .respond_with(html_page(&body))
            .mount(&server)
            .await;

        let out = ScrapeWebsiteTool::new()
            .unwrap()
            .invoke(json!({"website_url": server.uri(), "max_tokens": 10}))
            .await;

        assert!(out.starts_with("word word"));
        assert!(out.contains("\n\n[Content truncated at "));
        assert!(out.len() < 200);
    }

    #[tokio::test]
    async fn test_call_url_overrides_bound_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/other"))
            .respond_with(html_page("<p>Other page</p>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bound"))
            .respond_with(html_page("<p>Bound page</p>"))
            .expect(0)
            .mount(&server)
            .await;

        let tool = ScrapeWebsiteTool::for_url(&format!("{}/bound", server.uri())).unwrap();
        let out = tool
            .invoke(json!({"website_url": format!("{}/other", server.uri())}))
            .await;
        assert_eq!(out, "Other page");
    }

    #[tokio::test]
    async fn test_bound_url_and_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .and(header("cookie", "session=abc123"))
            .respond_with(html_page("<div>Signed in</div>"))
            .expect(1)
            .mount(&server)
            .await;

        let config = ToolConfig::from_pairs([("SITE_SESSION", "abc123")]);
        let tool = ScrapeWebsiteTool::for_url(&format!("{}/account", server.uri()))
            .unwrap()
            .with_cookie("session", "SITE_SESSION", &config)
            .unwrap();
        assert_eq!(tool.invoke(json!({})).await, "Signed in");
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let out = ScrapeWebsiteTool::new()
            .unwrap()
            .invoke(json!({"website_url": "not-a-valid-url-at-all"}))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["kind"], "validation");
    }

    #[tokio::test]
    async fn test_not_found_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let out = ScrapeWebsiteTool::new()
            .unwrap()
            .invoke(json!({"website_url": server.uri()}))
            .await;
        assert!(out.contains("404"));
        assert!(out.contains("\"kind\":\"upstream\""));
    }
}
