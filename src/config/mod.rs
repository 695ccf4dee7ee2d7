//! Configuration module for Doc-Stitch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use doc_stitch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("doc-stitch.toml")).unwrap();
//! println!("Pages per batch: {}", config.crawler.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed_url};
