//! Stellenwerk-Crawler main entry point
//!
//! This is the command-line interface for the Stellenwerk job-listing crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use stellenwerk_crawler::config::{load_config, validate, Config};
use stellenwerk_crawler::crawler::{BatchCrawler, ListingScanner};
use stellenwerk_crawler::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Stellenwerk-Crawler: a paced job-listing harvester
///
/// Walks the paginated Stellenwerk index in batches, extracts every job
/// listing, and writes one CSV file per batch. Without arguments it crawls
/// the Hamburg listings with the built-in settings.
#[derive(Parser, Debug)]
#[command(name = "stellenwerk-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A paced job-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum number of index pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the directory the CSV files are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.pacing.max_pages = max_pages;
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stellenwerk_crawler=info,warn"),
            1 => EnvFilter::new("stellenwerk_crawler=debug,info"),
            2 => EnvFilter::new("stellenwerk_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Stellenwerk-Crawler Dry Run ===\n");

    println!("Site:");
    println!("  Index: {}", config.site.base_url);
    println!("  Host: {}", config.site.host);
    println!("  Listing marker: {}", config.site.listing_marker);
    println!(
        "  Excluded markers: {}",
        config.site.excluded_markers.join(", ")
    );
    println!("  Page size: {}", config.site.page_size);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Referer: {}", config.http.referer);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nPacing:");
    println!(
        "  Request delay: {}ms (+ up to {}ms jitter)",
        config.pacing.request_delay_ms, config.pacing.jitter_ms
    );
    println!("  Pages per batch: {}", config.pacing.batch_size);
    println!("  Pause between batches: {}ms", config.pacing.batch_pause_ms);
    println!("  Max pages: {}", config.pacing.max_pages);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  File prefix: {}", config.output.file_prefix);

    let client = reqwest::Client::new();
    let scanner = ListingScanner::new(client, config.site.clone())?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", scanner.index_url(0));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    println!("Starting scraper in batches...");

    let mut crawler = BatchCrawler::from_config(config).context("Failed to set up crawler")?;
    let records = crawler.run(config.pacing.max_pages).await;

    println!("\nAll batches completed! {} jobs scraped.\n", records.len());
    print_statistics(crawler.stats());

    Ok(())
}
