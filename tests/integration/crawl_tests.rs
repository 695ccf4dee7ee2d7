//! Integration tests for the stitcher
//!
//! These tests use wiremock to create mock documentation sites and run the
//! full discover → fetch → assemble cycle end-to-end.

use doc_stitch::config::Config;
use doc_stitch::crawler::{
    build_http_client, run_stitch, Coordinator, HttpLinkDiscovery, HttpPageFetcher, RunOutcome,
};
use doc_stitch::RunPhase;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &Path, batch_size: usize) -> Config {
    let mut config = Config::default();
    config.crawler.batch_size = batch_size;
    config.output.document_path = dir.join("output/combined.md").to_string_lossy().into_owned();
    config.output.title = "Test Docs".to_string();
    config
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_stitch_with_partial_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        200,
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <nav><a href="{base}/x">X docs</a></nav>
            <a href="/y">Y docs</a>
            <a href="z">Z docs</a>
            <a href="/x">X again</a>
            </body></html>"#
        ),
    )
    .await;

    mount_page(
        &server,
        "/x",
        200,
        r#"<html><head><title>Page X</title></head><body>
        <nav>Sidebar links</nav>
        <main><h2>Intro</h2><p>Content of X.</p></main>
        <footer>Footer text</footer>
        </body></html>"#,
    )
    .await;

    mount_page(&server, "/y", 500, "<html><body>Server error</body></html>").await;

    mount_page(
        &server,
        "/z",
        200,
        r#"<html><head><title>Page Z</title></head><body>
        <article><p>Content of Z.</p></article>
        </body></html>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 2);

    let outcome = run_stitch(config, &format!("{}/", base))
        .await
        .expect("Stitch failed");

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.batches, 2);

    let written = fs::read_to_string(&summary.document_path).expect("document missing");

    assert!(written.starts_with("# Test Docs\n\n*Generated automatically from web crawling*\n\n"));
    assert!(written.contains("- [Page X](#page-x)\n- [Page Z](#page-z)\n"));
    assert_eq!(written.matches("## Table of Contents").count(), 1);

    let section_x = written.find("\n## Page X\n").expect("section X");
    let section_z = written.find("\n## Page Z\n").expect("section Z");
    assert!(section_x < section_z);
    assert!(written.contains(&format!("*Source: [{base}/x]({base}/x)*")));

    assert!(written.contains("Content of X."));
    assert!(written.contains("Content of Z."));
    assert!(!written.contains("Sidebar links"));
    assert!(!written.contains("Footer text"));
    assert!(!written.contains("Server error"));
}

#[tokio::test]
async fn test_no_links_writes_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, "<html><body><p>No links here</p></body></html>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 3);
    let document_path = config.output.document_path.clone();

    let outcome = run_stitch(config, &format!("{}/", server.uri()))
        .await
        .expect("Stitch failed");

    assert!(matches!(outcome, RunOutcome::NoUrlsFound));
    assert!(!Path::new(&document_path).exists());

    // Only the seed page was requested
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_seed_failure_aborts_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 404, "missing").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 3);
    let document_path = config.output.document_path.clone();

    let result = run_stitch(config, &format!("{}/", server.uri())).await;

    assert!(result.is_err());
    assert!(!Path::new(&document_path).exists());
}

#[tokio::test]
async fn test_duplicate_titles_share_anchor() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        200,
        r#"<html><body><a href="/one">One</a><a href="/two">Two</a></body></html>"#,
    )
    .await;
    for route in ["/one", "/two"] {
        mount_page(
            &server,
            route,
            200,
            "<html><head><title>Overview</title></head><body><main><p>Overview text</p></main></body></html>",
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 5);

    let client = build_http_client(&config.user_agent).unwrap();
    let mut coordinator = Coordinator::new(
        config,
        HttpLinkDiscovery::new(client.clone()),
        HttpPageFetcher::new(client),
    )
    .unwrap();

    let outcome = coordinator.run(&format!("{}/", base)).await.unwrap();
    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(coordinator.phase(), RunPhase::Done);

    let slugs: Vec<&str> = coordinator
        .pages()
        .iter()
        .map(|p| p.anchor_slug.as_str())
        .collect();
    assert_eq!(slugs, vec!["overview", "overview"]);

    let written = fs::read_to_string(&summary.document_path).unwrap();
    assert_eq!(written.matches("- [Overview](#overview)").count(), 2);
}
