//! Doc-Stitch main entry point
//!
//! This is the command-line interface for stitching a documentation site
//! into a single Markdown document.

use anyhow::Context;
use clap::Parser;
use doc_stitch::config::{load_config_with_hash, validate, validate_seed_url, Config};
use doc_stitch::crawler::{
    build_http_client, run_stitch, HttpLinkDiscovery, LinkDiscovery, RunOutcome,
};
use doc_stitch::output::print_summary;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Doc-Stitch: one Markdown file from a whole documentation site
///
/// Doc-Stitch reads the links of a documentation landing page, fetches every
/// linked page in concurrent batches, and writes all of them into a single
/// Markdown document with a table of contents.
#[derive(Parser, Debug)]
#[command(name = "doc-stitch")]
#[command(version)]
#[command(about = "Stitch a documentation site into one Markdown file", long_about = None)]
struct Cli {
    /// URL of the documentation main page (prompted for when omitted)
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the combined document (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pages fetched concurrently per batch (overrides the config file)
    #[arg(short, long, value_name = "N")]
    batch_size: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover and list the pages that would be fetched, without fetching them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let total_start = Instant::now();
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let seed = match &cli.seed {
        Some(seed) => seed.clone(),
        None => prompt_for_seed()?,
    };
    let seed = validate_seed_url(seed.trim())?.to_string();

    if cli.dry_run {
        handle_dry_run(&config, &seed).await?;
    } else {
        handle_stitch(config, &seed).await?;
    }

    let total = total_start.elapsed().as_secs_f64();
    println!(
        "\nTotal process time (including setup): {:.2} seconds ({:.2} minutes)",
        total,
        total / 60.0
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_stitch=info,warn"),
            1 => EnvFilter::new("doc_stitch=debug,info"),
            2 => EnvFilter::new("doc_stitch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.document_path = output.to_string_lossy().into_owned();
    }
    if let Some(batch_size) = cli.batch_size {
        config.crawler.batch_size = batch_size;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Reads the seed URL from stdin
fn prompt_for_seed() -> anyhow::Result<String> {
    print!("Enter the URL of the documentation main page: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Handles the --dry-run mode: discovers pages and shows what would be fetched
async fn handle_dry_run(config: &Config, seed: &str) -> anyhow::Result<()> {
    println!("=== Doc-Stitch Dry Run ===\n");

    println!("Fetch Configuration:");
    println!("  Batch size: {}", config.crawler.batch_size);
    println!(
        "  Excluded selectors: {}",
        config.crawler.excluded_selectors.join(", ")
    );
    println!("  Excluded tags: {}", config.crawler.excluded_tags.join(", "));
    println!("  Keep data attributes: {}", config.crawler.keep_data_attributes);
    println!("  Bypass cache: {}", config.crawler.bypass_cache);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Document: {}", config.output.document_path);
    println!("  Title: {}", config.output.title);

    let client = build_http_client(&config.user_agent)?;
    let urls = HttpLinkDiscovery::new(client).discover(seed).await?;

    println!("\nDiscovered URLs ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    let batches = urls.len().div_ceil(config.crawler.batch_size);
    println!("\n✓ Would fetch {} URLs in {} batches", urls.len(), batches);

    Ok(())
}

/// Handles the main stitch operation
async fn handle_stitch(config: Config, seed: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Starting stitch of {} (batch size {}, output {})",
        seed,
        config.crawler.batch_size,
        config.output.document_path
    );

    match run_stitch(config, seed).await {
        Ok(RunOutcome::Completed(summary)) => {
            print_summary(&summary);
            Ok(())
        }
        Ok(RunOutcome::NoUrlsFound) => {
            println!("No URLs found to crawl");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Stitch failed: {}", e);
            Err(e.into())
        }
    }
}
