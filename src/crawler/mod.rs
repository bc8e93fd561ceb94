//! Crawler module for fetching and extracting job listings
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - Index-page scanning and listing-link deduplication
//! - Per-listing field extraction with fallback selectors
//! - Following "dein job" / "dein profil" sub-pages
//! - Batching, pacing, and overall crawl coordination

mod batch;
mod extractor;
mod fetcher;
mod follower;
mod links;
mod scanner;
mod text;

pub use batch::BatchCrawler;
pub use extractor::{
    extract_fields, field_rules, ExtractedFields, Field, FieldExtractor, FieldRule, Strategy,
    DEIN_JOB_PHRASE, DEIN_PROFIL_PHRASE,
};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use follower::{snippet_from_html, SubLinkFollower, SNIPPET_MAX_CHARS};
pub use links::resolve_href;
pub use scanner::{extract_listing_links, ListingScanner};

use crate::config::Config;
use crate::record::JobRecord;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the CSV sink
/// 2. Walk the index pages in batches
/// 3. Extract one record per listing
/// 4. Write every batch to its own CSV file
///
/// # Arguments
///
/// * `config` - The crawler configuration; `pacing.max_pages` bounds the crawl
///
/// # Returns
///
/// * `Ok(Vec<JobRecord>)` - Every record extracted, in crawl order
/// * `Err(CrawlerError)` - The crawler could not be set up
pub async fn crawl(config: &Config) -> Result<Vec<JobRecord>> {
    let mut crawler = BatchCrawler::from_config(config)?;
    Ok(crawler.run(config.pacing.max_pages).await)
}
