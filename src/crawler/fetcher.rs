//! Page fetching
//!
//! This module defines what a fetch produces and the seam the batch scheduler
//! calls through:
//! - `FetchOutcome`: the structured result of fetching and rendering one URL
//! - `PageFetcher`: the collaborator trait the core fetches through
//! - `HttpPageFetcher`: the reqwest-backed implementation used by the binary

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::{clean_html, extract_metadata_title, main_content_html, CleaningRules};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use scraper::Html;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A named textual rendering of a page, listed from most to least preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Markdown of the page's main content region only
    FitMarkdown,
    /// Markdown of the whole cleaned page
    Markdown,
    /// Page HTML with excluded regions removed
    CleanedHtml,
    /// The HTML exactly as served
    RawHtml,
}

impl Representation {
    /// All representations in preference order
    pub const PREFERENCE_ORDER: [Representation; 4] = [
        Representation::FitMarkdown,
        Representation::Markdown,
        Representation::CleanedHtml,
        Representation::RawHtml,
    ];

    /// Returns true for the HTML forms, which are fenced when written out
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::CleanedHtml | Self::RawHtml)
    }
}

/// Result of one fetch attempt
///
/// Immutable once returned by a fetcher; owned by whoever requested the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL that was requested
    pub url: String,

    /// Whether the page was retrieved and rendered
    pub succeeded: bool,

    /// Why the fetch did not succeed (present iff `succeeded` is false)
    pub failure_reason: Option<String>,

    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,

    /// Title from the page metadata
    pub title: Option<String>,

    pub fit_markdown: Option<String>,
    pub markdown: Option<String>,
    pub cleaned_html: Option<String>,
    pub html: Option<String>,
}

impl FetchOutcome {
    /// Creates a successful outcome with no representations yet
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            succeeded: true,
            ..Default::default()
        }
    }

    /// Creates a failed outcome
    pub fn failure(
        url: impl Into<String>,
        reason: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            url: url.into(),
            succeeded: false,
            failure_reason: Some(reason.into()),
            status_code,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Sets one representation
    pub fn with_representation(mut self, kind: Representation, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match kind {
            Representation::FitMarkdown => self.fit_markdown = text,
            Representation::Markdown => self.markdown = text,
            Representation::CleanedHtml => self.cleaned_html = text,
            Representation::RawHtml => self.html = text,
        }
        self
    }

    /// Returns a representation if it is present and non-empty
    pub fn representation(&self, kind: Representation) -> Option<&str> {
        let text = match kind {
            Representation::FitMarkdown => self.fit_markdown.as_deref(),
            Representation::Markdown => self.markdown.as_deref(),
            Representation::CleanedHtml => self.cleaned_html.as_deref(),
            Representation::RawHtml => self.html.as_deref(),
        };
        text.filter(|t| !t.is_empty())
    }

    /// Returns the most preferred non-empty representation
    pub fn best_representation(&self) -> Option<(Representation, &str)> {
        Representation::PREFERENCE_ORDER
            .iter()
            .find_map(|&kind| self.representation(kind).map(|text| (kind, text)))
    }

    /// Returns true if at least one representation carries text
    pub fn has_content(&self) -> bool {
        self.best_representation().is_some()
    }
}

/// Errors raised by a fetcher instead of returning an outcome
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Classifies a reqwest error for the given URL
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url }
        } else if source.is_connect() {
            FetchError::Connect { url, source }
        } else {
            FetchError::Http { url, source }
        }
    }
}

/// Fetches and renders a single page
///
/// The fetch configuration is passed through untouched; implementations
/// decide which of its rules apply to them.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        config: &CrawlerConfig,
    ) -> impl Future<Output = Result<FetchOutcome, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use doc_stitch::config::UserAgentConfig;
/// use doc_stitch::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and renders them to Markdown
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, config: &CrawlerConfig) -> Result<FetchOutcome, FetchError> {
        let mut request = self.client.get(url);
        if config.bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchOutcome::failure(
                url,
                format!("HTTP {}", status.as_u16()),
                Some(status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(render_page(url, status.as_u16(), body, config))
    }
}

/// Renders a fetched HTML body into every representation it supports
///
/// Representations that cannot be produced are left empty; the extractor
/// falls back along the preference order.
pub fn render_page(
    url: &str,
    status_code: u16,
    body: String,
    config: &CrawlerConfig,
) -> FetchOutcome {
    let rules = CleaningRules::from_config(config);
    let document = Html::parse_document(&body);

    let mut outcome = FetchOutcome::success(url).with_status(status_code);
    outcome.title = extract_metadata_title(&document);

    let cleaned = clean_html(&document, &rules);
    outcome.markdown = to_markdown(url, &cleaned);
    outcome.fit_markdown =
        main_content_html(&document, &rules).and_then(|main| to_markdown(url, &main));
    outcome.cleaned_html = Some(cleaned).filter(|html| !html.trim().is_empty());
    outcome.html = Some(body);

    outcome
}

fn to_markdown(url: &str, html: &str) -> Option<String> {
    match htmd::convert(html) {
        Ok(markdown) if !markdown.trim().is_empty() => Some(markdown),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Markdown conversion failed for {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html>
        <head><title>Install Guide</title></head>
        <body>
            <nav><a href="/">Home</a></nav>
            <main><h1>Installing</h1><p>Run the installer.</p></main>
            <footer>Copyright</footer>
        </body>
    </html>"#;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&UserAgentConfig::default()).is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let mut config = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(config.header_value(), "TestCrawler/1.0");

        config.contact_url = Some("https://example.com/about".to_string());
        assert_eq!(config.header_value(), "TestCrawler/1.0 (+https://example.com/about)");
    }

    #[test]
    fn test_best_representation_order() {
        let outcome = FetchOutcome::success("https://a/x")
            .with_representation(Representation::RawHtml, "<p>raw</p>")
            .with_representation(Representation::Markdown, "full");
        assert_eq!(
            outcome.best_representation(),
            Some((Representation::Markdown, "full"))
        );
    }

    #[test]
    fn test_whitespace_representation_is_present() {
        let outcome = FetchOutcome::success("https://a/x")
            .with_representation(Representation::FitMarkdown, "\n")
            .with_representation(Representation::RawHtml, "<p>raw</p>");
        assert_eq!(outcome.representation(Representation::FitMarkdown), Some("\n"));
        assert_eq!(
            outcome.best_representation(),
            Some((Representation::FitMarkdown, "\n"))
        );

        let empty = FetchOutcome::success("https://a/x")
            .with_representation(Representation::FitMarkdown, "")
            .with_representation(Representation::CleanedHtml, "<p>x</p>");
        assert_eq!(empty.representation(Representation::FitMarkdown), None);
        assert_eq!(
            empty.best_representation().map(|(kind, _)| kind),
            Some(Representation::CleanedHtml)
        );
    }

    #[test]
    fn test_has_content() {
        assert!(!FetchOutcome::success("https://a/x").has_content());
        assert!(FetchOutcome::success("https://a/x")
            .with_representation(Representation::RawHtml, "<html></html>")
            .has_content());
        assert!(FetchOutcome::success("https://a/x")
            .with_representation(Representation::RawHtml, "   ")
            .has_content());
    }

    #[test]
    fn test_render_page_produces_all_representations() {
        let outcome = render_page(
            "https://a/install",
            200,
            PAGE.to_string(),
            &CrawlerConfig::default(),
        );

        assert!(outcome.succeeded);
        assert_eq!(outcome.status_code, Some(200));
        assert_eq!(outcome.title.as_deref(), Some("Install Guide"));
        assert_eq!(outcome.html.as_deref(), Some(PAGE));

        let cleaned = outcome.cleaned_html.as_deref().unwrap();
        assert!(cleaned.contains("Run the installer."));
        assert!(!cleaned.contains("Home"));
        assert!(!cleaned.contains("Copyright"));

        let fit = outcome.fit_markdown.as_deref().unwrap();
        assert!(fit.contains("Installing"));
        assert!(fit.contains("Run the installer."));

        assert!(outcome.markdown.as_deref().unwrap().contains("Run the installer."));
    }

    #[test]
    fn test_render_page_without_main_region() {
        let html = "<html><body><p>Just a paragraph.</p></body></html>";
        let outcome = render_page("https://a/p", 200, html.to_string(), &CrawlerConfig::default());

        assert_eq!(outcome.fit_markdown, None);
        assert!(outcome.markdown.as_deref().unwrap().contains("Just a paragraph."));
        assert_eq!(outcome.title, None);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/install"))
            .and(header("cache-control", "no-cache"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(PAGE)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(build_http_client(&UserAgentConfig::default()).unwrap());
        let url = format!("{}/install", server.uri());
        let outcome = fetcher.fetch(&url, &CrawlerConfig::default()).await.unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.url, url);
        assert_eq!(outcome.title.as_deref(), Some("Install Guide"));
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_unsuccessful_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(build_http_client(&UserAgentConfig::default()).unwrap());
        let outcome = fetcher
            .fetch(&format!("{}/missing", server.uri()), &CrawlerConfig::default())
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.status_code, Some(404));
        assert_eq!(outcome.failure_reason.as_deref(), Some("HTTP 404"));
        assert!(!outcome.has_content());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_error() {
        let fetcher = HttpPageFetcher::new(build_http_client(&UserAgentConfig::default()).unwrap());
        // Port 9 (discard) is closed on test machines
        let result = fetcher
            .fetch("http://127.0.0.1:9/", &CrawlerConfig::default())
            .await;
        assert!(result.is_err());
    }
}
