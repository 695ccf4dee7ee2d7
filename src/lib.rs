//! Doc-Stitch: turns a documentation site into one Markdown document
//!
//! This crate discovers the pages linked from a documentation landing page,
//! fetches them in fixed-size concurrent batches, picks the most readable
//! representation of each page, and stitches everything into a single file
//! with a table of contents.

pub mod config;
pub mod crawler;
pub mod monitor;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Doc-Stitch operations
#[derive(Debug, Error)]
pub enum DocStitchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Link discovery failed for {url}: {message}")]
    Discovery { url: String, message: String },

    #[error("Output document error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Doc-Stitch operations
pub type Result<T> = std::result::Result<T, DocStitchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchOutcome, PageEntry, RunOutcome};
pub use output::RunSummary;
pub use state::RunPhase;
