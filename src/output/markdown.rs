//! Markdown formatting for the combined document
//!
//! Pure string builders; the document builder decides where they are written.

use crate::crawler::PageEntry;

/// Marker written at initialization and later replaced by the real TOC
///
/// It is also the heading of the generated TOC, so a run that produced no
/// pages leaves an empty table of contents behind.
pub const TOC_PLACEHOLDER: &str = "## Table of Contents\n\n";

/// Separator written after each page section
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Formats the document header, ending with the TOC placeholder
pub fn format_header(title: &str) -> String {
    format!(
        "# {}\n\n*Generated automatically from web crawling*\n\n{}",
        title, TOC_PLACEHOLDER
    )
}

/// Formats one page section, including its trailing separator
pub fn format_section(entry: &PageEntry) -> String {
    format!(
        "\n## {title}\n*Source: [{url}]({url})*\n\n{content}{separator}",
        title = entry.title,
        url = entry.url,
        content = entry.content,
        separator = SECTION_SEPARATOR
    )
}

/// Formats the table of contents, one link per entry in the given order
pub fn format_table_of_contents(entries: &[PageEntry]) -> String {
    let mut toc = String::from(TOC_PLACEHOLDER);
    for entry in entries {
        toc.push_str(&format!("- [{}](#{})\n", entry.title, entry.anchor_slug));
    }
    toc.push_str("\n---\n\n");
    toc
}
