//! Content extraction
//!
//! Turns a successful fetch outcome into a `PageEntry`: resolves the title,
//! derives the anchor slug and picks the best available representation.

use crate::crawler::fetcher::{FetchOutcome, Representation};
use crate::crawler::parser::title_from_markup;

/// Title used when a page advertises none
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Content used when a page has no usable representation
pub const NO_CONTENT_EXTRACTED: &str = "*No content extracted*";

/// A processed page, ready to be written into the combined document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub url: String,
    pub title: String,
    /// In-document link target derived from `title`
    pub anchor_slug: String,
    pub content: String,
}

impl PageEntry {
    /// Creates an entry, deriving the anchor slug from the title
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            url: url.into(),
            anchor_slug: slugify(&title),
            title,
            content: content.into(),
        }
    }

    /// Builds the entry for a fetch already known to have succeeded
    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        Self::new(
            outcome.url.clone(),
            resolve_title(outcome),
            select_content(outcome),
        )
    }
}

/// Extracts a page entry from a fetch outcome
///
/// Returns `None` when the fetch did not succeed.
pub fn extract(outcome: &FetchOutcome) -> Option<PageEntry> {
    outcome.succeeded.then(|| PageEntry::from_outcome(outcome))
}

/// Resolves a page title
///
/// Order: metadata title, then the `<title>` of the raw markup, then
/// [`UNTITLED_PAGE`].
pub fn resolve_title(outcome: &FetchOutcome) -> String {
    outcome
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            outcome
                .representation(Representation::RawHtml)
                .and_then(title_from_markup)
        })
        .unwrap_or_else(|| UNTITLED_PAGE.to_string())
}

/// Picks the content to write for a page
///
/// First non-empty of: fit markdown, full markdown, cleaned HTML (fenced),
/// raw HTML (fenced). Falls back to [`NO_CONTENT_EXTRACTED`].
pub fn select_content(outcome: &FetchOutcome) -> String {
    match outcome.best_representation() {
        Some((kind, text)) if kind.is_structural() => format!("```html\n{}\n```", text),
        Some((_, text)) => text.to_string(),
        None => NO_CONTENT_EXTRACTED.to_string(),
    }
}

/// Derives a URL-safe anchor from a title
///
/// Lowercases, turns spaces into hyphens, drops periods and commas, then
/// drops anything that is not alphanumeric or a hyphen. Idempotent.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .replace(['.', ','], "")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}
