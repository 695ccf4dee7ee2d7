//! Output module for the combined document and run reports
//!
//! This module handles:
//! - Writing the combined Markdown document (header, sections, TOC)
//! - Formatting the Markdown pieces of that document
//! - Collecting and printing run statistics

mod document;
pub mod markdown;
pub mod stats;

pub use document::DocumentBuilder;
pub use markdown::{format_section, format_table_of_contents, TOC_PLACEHOLDER};
pub use stats::{format_summary, print_summary, RunSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing the combined document
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read back {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Table of contents placeholder missing from {}", .0.display())]
    PlaceholderMissing(PathBuf),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
