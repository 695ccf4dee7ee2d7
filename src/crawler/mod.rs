//! Crawler module for discovering, fetching and extracting pages
//!
//! This module contains the core stitching logic, including:
//! - Link discovery from the seed page
//! - HTTP fetching and rendering of each page
//! - Batched, bounded-concurrency scheduling
//! - Content extraction and overall run coordination

mod coordinator;
mod discovery;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_stitch, Coordinator, RunOutcome};
pub use discovery::{HttpLinkDiscovery, LinkDiscovery};
pub use extractor::{
    extract, resolve_title, select_content, slugify, PageEntry, NO_CONTENT_EXTRACTED,
    UNTITLED_PAGE,
};
pub use fetcher::{
    build_http_client, render_page, FetchError, FetchOutcome, HttpPageFetcher, PageFetcher,
    Representation,
};
pub use parser::{extract_doc_links, title_from_markup};
pub use scheduler::{BatchScheduler, FetchFailure, SettledFetch};
