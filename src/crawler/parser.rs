//! HTML parser for extracting links, titles and content regions
//!
//! This module handles parsing HTML content to extract:
//! - Candidate links from a documentation landing page
//! - Page titles (metadata and `<title>`)
//! - A cleaned copy of the page with navigation chrome removed
//! - The main content region of a page

use crate::config::CrawlerConfig;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements that never carry readable content
const ALWAYS_REMOVED: &[&str] = &["script", "style", "noscript", "template"];

/// Elements without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Candidate main-content containers, most specific first
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "[data-docs-content]",
    ".docs-content",
    ".markdown-body",
    "article",
    "main",
    "[role='main']",
    "#content",
    ".content",
];

/// Rules deciding which elements are dropped from cleaned HTML
#[derive(Debug, Clone)]
pub struct CleaningRules {
    selectors: Vec<Selector>,
    tags: Vec<String>,
    keep_data_attributes: bool,
}

impl CleaningRules {
    /// Builds cleaning rules from the fetch configuration
    ///
    /// Selectors that fail to parse are skipped; configuration validation
    /// rejects them before a run starts.
    pub fn from_config(config: &CrawlerConfig) -> Self {
        let selectors = config
            .excluded_selectors
            .iter()
            .filter_map(|s| match Selector::parse(s) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!("Ignoring invalid excluded selector '{}': {:?}", s, e);
                    None
                }
            })
            .collect();

        Self {
            selectors,
            tags: config
                .excluded_tags
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            keep_data_attributes: config.keep_data_attributes,
        }
    }

    /// Returns true if the element (and its subtree) must be dropped
    fn excludes(&self, element: &ElementRef<'_>) -> bool {
        let name = element.value().name();
        ALWAYS_REMOVED.contains(&name)
            || self.tags.iter().any(|t| t == name)
            || self.selectors.iter().any(|s| s.matches(element))
    }
}

/// Extracts the page title from the `<title>` element
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the title a page advertises in its metadata
///
/// Prefers `og:title`, then falls back to `<title>`.
pub fn extract_metadata_title(document: &Html) -> Option<String> {
    let og_selector = Selector::parse("meta[property='og:title'][content]").ok()?;

    document
        .select(&og_selector)
        .filter_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .or_else(|| extract_title(document))
}

/// Parses raw markup and returns its `<title>` text
pub fn title_from_markup(html: &str) -> Option<String> {
    extract_title(&Html::parse_document(html))
}

/// Extracts the unique candidate page links of a landing page
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` with non-empty link text, resolved against
/// `base_url`.
///
/// **Exclude:**
/// - links without visible text
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links
/// - non-HTTP(S) URLs after resolution
///
/// Duplicates are dropped; the first occurrence keeps its position.
pub fn extract_doc_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let text = element.text().collect::<String>();
        if text.trim().is_empty() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

/// Serializes the page body with excluded elements removed
pub fn clean_html(document: &Html, rules: &CleaningRules) -> String {
    let mut out = String::new();
    match Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
    {
        Some(body) => write_children(body, rules, &mut out),
        None => write_children(document.root_element(), rules, &mut out),
    }
    out
}

/// Serializes the first main-content container that has visible text
///
/// Containers inside excluded regions are not considered.
pub fn main_content_html(document: &Html, rules: &CleaningRules) -> Option<String> {
    for raw in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };

        for candidate in document.select(&selector) {
            if is_inside_excluded(candidate, rules) {
                continue;
            }

            let mut out = String::new();
            write_element(candidate, rules, &mut out);
            let has_text = Html::parse_fragment(&out)
                .root_element()
                .text()
                .any(|t| !t.trim().is_empty());
            if has_text {
                return Some(out);
            }
        }
    }

    None
}

fn is_inside_excluded(element: ElementRef<'_>, rules: &CleaningRules) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|e| rules.excludes(&e))
}

fn write_element(element: ElementRef<'_>, rules: &CleaningRules, out: &mut String) {
    let name = element.value().name();

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        if !rules.keep_data_attributes && attr.starts_with("data-") {
            continue;
        }
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&escape(value, true));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(element, rules, out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_children(element: ElementRef<'_>, rules: &CleaningRules, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape(text, false)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if !rules.excludes(&child_element) {
                        write_element(child_element, rules, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
