//! Batch scheduler for bounded concurrent fetching
//!
//! This module handles:
//! - Partitioning the URL list into fixed-size batches
//! - Running every fetch of a batch concurrently
//! - Waiting for the whole batch to settle before the next one starts
//! - Turning errors, panics and empty pages into per-URL failures
//!
//! Batches run strictly one after another, so at most `batch_size` fetches
//! are ever in flight.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchError, FetchOutcome, PageFetcher};
use crate::DocStitchError;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::slice::Chunks;
use thiserror::Error;

/// Why a single URL produced no usable outcome
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// The fetcher reported the page as not retrieved
    #[error("status code: {}, reason: {reason}", status_label(.status_code))]
    Unsuccessful {
        reason: String,
        status_code: Option<u16>,
    },

    /// The fetcher returned an error instead of an outcome
    #[error(transparent)]
    Errored(#[from] FetchError),

    /// The fetch task panicked
    #[error("fetch panicked: {0}")]
    Panicked(String),

    /// The fetch succeeded but carried no content representation
    #[error("no content representation available")]
    NoContent,
}

/// The settled result of one URL in a batch
#[derive(Debug)]
pub struct SettledFetch {
    /// The URL that was submitted
    pub url: String,

    /// The outcome, or why there is none
    pub result: Result<FetchOutcome, FetchFailure>,
}

impl SettledFetch {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs fetches in sequential, fixed-size concurrent batches
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl BatchScheduler {
    /// Creates a scheduler
    ///
    /// # Returns
    ///
    /// * `Ok(BatchScheduler)` - `batch_size` is at least 1
    /// * `Err(DocStitchError::InvalidBatchSize)` - `batch_size` is 0
    pub fn new(batch_size: usize) -> Result<Self, DocStitchError> {
        if batch_size == 0 {
            return Err(DocStitchError::InvalidBatchSize(batch_size));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Splits `urls` into consecutive batches; the last may be smaller
    pub fn batches<'a>(&self, urls: &'a [String]) -> Chunks<'a, String> {
        urls.chunks(self.batch_size)
    }

    /// Number of batches needed for `url_count` URLs
    pub fn batch_count(&self, url_count: usize) -> usize {
        url_count.div_ceil(self.batch_size)
    }

    /// Fetches every URL of one batch concurrently and waits for all of them
    ///
    /// Results come back in submission order, each paired with the URL it
    /// was fetched for. A failing or panicking fetch never cancels its
    /// siblings.
    pub async fn run_batch<F: PageFetcher>(
        &self,
        batch: &[String],
        fetcher: &F,
        config: &CrawlerConfig,
    ) -> Vec<SettledFetch> {
        let fetches = batch.iter().enumerate().map(|(slot, url)| async move {
            tracing::debug!("Fetching {} (slot {})", url, slot);
            let result = AssertUnwindSafe(fetcher.fetch(url, config))
                .catch_unwind()
                .await;
            SettledFetch {
                url: url.clone(),
                result: settle(result),
            }
        });

        join_all(fetches).await
    }

    /// Runs every batch in order and collects all settled results
    pub async fn run_batches<F: PageFetcher>(
        &self,
        urls: &[String],
        fetcher: &F,
        config: &CrawlerConfig,
    ) -> Vec<SettledFetch> {
        let mut settled = Vec::with_capacity(urls.len());
        for batch in self.batches(urls) {
            settled.extend(self.run_batch(batch, fetcher, config).await);
        }
        settled
    }
}

/// Classifies a fetch result into an outcome or a failure
fn settle(
    result: Result<Result<FetchOutcome, FetchError>, Box<dyn Any + Send>>,
) -> Result<FetchOutcome, FetchFailure> {
    let outcome = match result {
        Err(panic) => return Err(FetchFailure::Panicked(panic_message(panic.as_ref()))),
        Ok(Err(e)) => return Err(FetchFailure::Errored(e)),
        Ok(Ok(outcome)) => outcome,
    };

    if !outcome.succeeded {
        return Err(FetchFailure::Unsuccessful {
            reason: outcome
                .failure_reason
                .unwrap_or_else(|| "unknown".to_string()),
            status_code: outcome.status_code,
        });
    }

    if !outcome.has_content() {
        return Err(FetchFailure::NoContent);
    }

    Ok(outcome)
}

fn status_label(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
