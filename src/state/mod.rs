//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: The phase a stitch run is in (idle, discovering, crawling, finalizing, done)

mod run_phase;

// Re-export main types
pub use run_phase::RunPhase;
