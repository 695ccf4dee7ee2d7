use serde::Deserialize;

/// Main configuration structure for Doc-Stitch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Fetch behavior configuration
///
/// The whole section is handed to the page fetcher unchanged; only
/// `batch_size` is read by the batch scheduler itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of pages fetched concurrently in one batch
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// CSS selectors whose elements are removed before extraction
    #[serde(rename = "excluded-selectors")]
    pub excluded_selectors: Vec<String>,

    /// Tag names whose elements are removed before extraction
    #[serde(rename = "excluded-tags")]
    pub excluded_tags: Vec<String>,

    /// Keep `data-*` attributes in the cleaned HTML (code blocks rely on them)
    #[serde(rename = "keep-data-attributes")]
    pub keep_data_attributes: bool,

    /// Ask intermediaries not to serve cached responses
    #[serde(rename = "bypass-cache")]
    pub bypass_cache: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            excluded_selectors: [
                "nav",
                ".sidebar",
                ".navigation",
                ".side-nav",
                ".menu",
                "aside",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_tags: vec!["footer".to_string(), "header".to_string()],
            keep_data_attributes: true,
            bypass_cache: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "doc-stitch".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the combined Markdown document
    #[serde(rename = "document-path")]
    pub document_path: String,

    /// Title written as the document's top-level heading
    pub title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document_path: "output/combined_documentation.md".to_string(),
            title: "Combined Documentation".to_string(),
        }
    }
}
