//! Run coordinator - main stitch orchestration logic
//!
//! This module drives one run through its phases:
//! - Discovering candidate pages from the seed URL
//! - Fetching them batch by batch and appending each extracted page
//! - Splicing the table of contents into the finished document
//! - Reporting the run summary

use crate::config::Config;
use crate::crawler::discovery::{HttpLinkDiscovery, LinkDiscovery};
use crate::crawler::extractor::PageEntry;
use crate::crawler::fetcher::{build_http_client, HttpPageFetcher, PageFetcher};
use crate::crawler::scheduler::{BatchScheduler, FetchFailure, SettledFetch};
use crate::monitor::MemoryMonitor;
use crate::output::{DocumentBuilder, RunSummary};
use crate::state::RunPhase;
use crate::DocStitchError;
use std::path::PathBuf;
use std::time::Instant;

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Discovery found nothing; no page was fetched and no document written
    NoUrlsFound,

    /// Every batch settled and the document was finalized
    Completed(RunSummary),
}

/// Main run coordinator
///
/// A coordinator performs exactly one run; a second call to
/// [`Coordinator::run`] fails with an invalid transition.
pub struct Coordinator<D, F> {
    config: Config,
    discovery: D,
    fetcher: F,
    scheduler: BatchScheduler,
    phase: RunPhase,
    pages: Vec<PageEntry>,
    memory: MemoryMonitor,
}

impl<D: LinkDiscovery, F: PageFetcher> Coordinator<D, F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `discovery` - Finds the URLs to fetch
    /// * `fetcher` - Fetches and renders a single page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DocStitchError)` - The configured batch size is invalid
    pub fn new(config: Config, discovery: D, fetcher: F) -> Result<Self, DocStitchError> {
        let scheduler = BatchScheduler::new(config.crawler.batch_size)?;

        Ok(Self {
            config,
            discovery,
            fetcher,
            scheduler,
            phase: RunPhase::Idle,
            pages: Vec::new(),
            memory: MemoryMonitor::new(),
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Pages written so far, in the order they were appended
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    /// Runs discovery, the batch loop and TOC finalization
    ///
    /// Individual fetch failures are recorded in the summary and never
    /// abort the run. Discovery failures and document I/O failures do.
    pub async fn run(&mut self, seed_url: &str) -> Result<RunOutcome, DocStitchError> {
        self.transition(RunPhase::Discovering)?;
        tracing::info!("Discovering pages linked from {}", seed_url);

        let urls = self.discovery.discover(seed_url).await?;
        if urls.is_empty() {
            tracing::warn!("No URLs found to crawl");
            self.transition(RunPhase::Done)?;
            return Ok(RunOutcome::NoUrlsFound);
        }

        tracing::info!("Found {} URLs to crawl", urls.len());
        self.transition(RunPhase::Crawling)?;
        let summary = self.crawl(&urls).await?;
        self.transition(RunPhase::Done)?;

        Ok(RunOutcome::Completed(summary))
    }

    /// Fetches every URL batch by batch, then finalizes the document
    async fn crawl(&mut self, urls: &[String]) -> Result<RunSummary, DocStitchError> {
        let started = Instant::now();
        let document_path = PathBuf::from(&self.config.output.document_path);
        let mut summary = RunSummary::new(document_path.clone());
        let mut document = DocumentBuilder::initialize(&document_path, &self.config.output.title)?;

        let total_batches = self.scheduler.batch_count(urls.len());
        tracing::info!(
            "Crawling {} URLs in {} batches of up to {}",
            urls.len(),
            total_batches,
            self.scheduler.batch_size()
        );

        for (index, batch) in self.scheduler.batches(urls).enumerate() {
            let number = index + 1;

            self.memory.sample(&format!("Before batch {}:", number));
            let settled = self
                .scheduler
                .run_batch(batch, &self.fetcher, &self.config.crawler)
                .await;
            self.memory.sample(&format!("After batch {}:", number));

            summary.batches += 1;
            for fetch in settled {
                self.record(fetch, &mut document, &mut summary)?;
            }

            tracing::info!(
                "Batch {}/{} settled ({} succeeded, {} failed so far)",
                number,
                total_batches,
                summary.succeeded,
                summary.failed
            );
        }

        self.transition(RunPhase::Finalizing)?;
        tracing::info!(
            "Appended {} page sections; building table of contents",
            document.sections()
        );
        let path = document.finalize_table_of_contents(&self.pages)?;
        tracing::info!("Combined documentation saved to: {}", path.display());

        self.memory.sample("Final:");
        summary.peak_memory_bytes = self.memory.peak_bytes();
        summary.elapsed = started.elapsed();

        Ok(summary)
    }

    /// Folds one settled fetch into the document and the counters
    fn record(
        &mut self,
        fetch: SettledFetch,
        document: &mut DocumentBuilder,
        summary: &mut RunSummary,
    ) -> Result<(), DocStitchError> {
        let outcome = match fetch.result {
            Ok(outcome) => outcome,
            Err(FetchFailure::NoContent) => {
                tracing::warn!(
                    "Error processing content from {}: {}",
                    fetch.url,
                    FetchFailure::NoContent
                );
                summary.record_processing_failure();
                return Ok(());
            }
            Err(failure) => {
                tracing::warn!("Failed to crawl {}: {}", fetch.url, failure);
                summary.record_failure();
                return Ok(());
            }
        };

        let entry = PageEntry::from_outcome(&outcome);
        document.append_page(&entry)?;
        summary.record_success();
        tracing::debug!("Appended '{}' from {}", entry.title, entry.url);
        self.pages.push(entry);

        Ok(())
    }

    fn transition(&mut self, to: RunPhase) -> Result<(), DocStitchError> {
        if !self.phase.can_transition_to(to) {
            return Err(DocStitchError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::debug!("Run phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }
}

/// Runs a complete stitch over HTTP
///
/// Builds the HTTP discovery and fetch collaborators from `config` and runs
/// one coordinator over `seed_url`.
///
/// # Example
///
/// ```no_run
/// use doc_stitch::config::Config;
/// use doc_stitch::crawler::run_stitch;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_stitch(Config::default(), "https://docs.dask.org/en/stable/").await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_stitch(config: Config, seed_url: &str) -> Result<RunOutcome, DocStitchError> {
    let client = build_http_client(&config.user_agent)?;
    let discovery = HttpLinkDiscovery::new(client.clone());
    let fetcher = HttpPageFetcher::new(client);

    let mut coordinator = Coordinator::new(config, discovery, fetcher)?;
    coordinator.run(seed_url).await
}
