//! Link discovery
//!
//! Finds the candidate pages of a documentation site by scanning the links of
//! its landing page. Discovery is not recursive: only the seed page is read.

use crate::crawler::parser::extract_doc_links;
use crate::DocStitchError;
use reqwest::Client;
use std::future::Future;
use url::Url;

/// Produces the ordered list of URLs to fetch for a seed URL
pub trait LinkDiscovery: Send + Sync {
    fn discover(
        &self,
        seed_url: &str,
    ) -> impl Future<Output = Result<Vec<String>, DocStitchError>> + Send;
}

/// Discovers links by fetching the seed page over HTTP
#[derive(Debug, Clone)]
pub struct HttpLinkDiscovery {
    client: Client,
}

impl HttpLinkDiscovery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl LinkDiscovery for HttpLinkDiscovery {
    async fn discover(&self, seed_url: &str) -> Result<Vec<String>, DocStitchError> {
        let base_url = Url::parse(seed_url)?;
        let failure = |message: String| DocStitchError::Discovery {
            url: seed_url.to_string(),
            message,
        };

        tracing::debug!("Fetching seed page {}", seed_url);
        let response = self
            .client
            .get(base_url.as_str())
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.map_err(|e| failure(e.to_string()))?;
        let links = extract_doc_links(&body, &base_url);

        tracing::debug!("Seed page {} links to {} unique pages", seed_url, links.len());
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserAgentConfig;
    use crate::crawler::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn discovery() -> HttpLinkDiscovery {
        HttpLinkDiscovery::new(build_http_client(&UserAgentConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_discover_resolves_and_dedupes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r##"<html><body>
                <a href="intro.html">Intro</a>
                <a href="/docs/api.html">API</a>
                <a href="intro.html">Intro again</a>
                <a href="#top">Top</a>
                <a href="mailto:docs@example.com">Mail</a>
                </body></html>"##,
            ))
            .mount(&server)
            .await;

        let seed = format!("{}/docs/", server.uri());
        let links = discovery().discover(&seed).await.unwrap();

        assert_eq!(
            links,
            vec![
                format!("{}/docs/intro.html", server.uri()),
                format!("{}/docs/api.html", server.uri()),
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>nothing</body></html>"),
            )
            .mount(&server)
            .await;

        let links = discovery()
            .discover(&format!("{}/", server.uri()))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_discover_http_error_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = discovery().discover(&format!("{}/", server.uri())).await;
        assert!(matches!(
            result,
            Err(DocStitchError::Discovery { ref message, .. }) if message == "HTTP 500"
        ));
    }

    #[tokio::test]
    async fn test_discover_invalid_seed() {
        let result = discovery().discover("not a url").await;
        assert!(matches!(result, Err(DocStitchError::UrlParse(_))));
    }
}
