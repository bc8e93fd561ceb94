//! Batch crawler - pagination, pacing, and batching orchestration
//!
//! The crawler walks index pages in increasing offset order, extracts a record
//! from every listing link, and groups the records of `batch-size` index pages
//! into one batch that is handed to the sink before pausing.
//!
//! The crawl ends when the page budget is used up, when an index page yields
//! no links, or when a batch ends up empty. No per-page failure ends it early
//! in any other way.

use crate::config::{validate, Config, PacingConfig};
use crate::crawler::extractor::FieldExtractor;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scanner::ListingScanner;
use crate::output::{CrawlStatistics, CsvSink, RecordSink};
use crate::record::JobRecord;
use crate::state::CrawlPhase;
use crate::CrawlerError;
use std::time::Duration;

/// Main batch crawler structure
pub struct BatchCrawler<S: RecordSink = CsvSink> {
    scanner: ListingScanner,
    extractor: FieldExtractor,
    sink: S,
    pacing: PacingConfig,
    page_size: u64,
    phase: CrawlPhase,
    stats: CrawlStatistics,
}

impl BatchCrawler<CsvSink> {
    /// Creates a crawler writing CSV files into the configured directory
    ///
    /// The output directory is created if it does not exist yet.
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        std::fs::create_dir_all(&config.output.directory)?;
        Self::with_sink(config, CsvSink::from_config(&config.output))
    }
}

impl<S: RecordSink> BatchCrawler<S> {
    /// Creates a crawler handing batches to `sink`
    ///
    /// # Returns
    ///
    /// * `Ok(BatchCrawler)` - Successfully created crawler
    /// * `Err(CrawlerError)` - The configuration is invalid or the HTTP client
    ///   cannot be built
    pub fn with_sink(config: &Config, sink: S) -> Result<Self, CrawlerError> {
        validate(config)?;
        let client = build_http_client(&config.http)?;
        let scanner = ListingScanner::new(client.clone(), config.site.clone())?;
        let extractor = FieldExtractor::new(client, &config.site.host)?;

        Ok(Self {
            scanner,
            extractor,
            sink,
            pacing: config.pacing.clone(),
            page_size: u64::from(config.site.page_size),
            phase: CrawlPhase::AdvancingPage,
            stats: CrawlStatistics::default(),
        })
    }

    /// Current phase of the crawl
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Crawls up to `max_pages` index pages and returns every record, in the
    /// order extracted
    ///
    /// Each non-empty batch is persisted as a side effect, with batch numbers
    /// counting up from 1.
    pub async fn run(&mut self, max_pages: u32) -> Vec<JobRecord> {
        let budget = u64::from(max_pages) * self.page_size;
        let mut cursor: u64 = 0;
        let mut batch_number: u32 = 0;
        let mut all_records = Vec::new();

        self.phase = CrawlPhase::AdvancingPage;
        tracing::info!(
            "Starting crawl: up to {} pages, {} pages per batch",
            max_pages,
            self.pacing.batch_size
        );

        loop {
            let mut batch: Vec<JobRecord> = Vec::new();
            let mut pages_in_batch: u32 = 0;

            let exhausted = loop {
                if pages_in_batch >= self.pacing.batch_size || cursor >= budget {
                    self.transition(CrawlPhase::BatchFull);
                    break false;
                }

                self.transition(CrawlPhase::FetchingLinks);
                let links = self.scanner.scan(cursor).await;
                self.stats.pages_scanned += 1;

                if links.is_empty() {
                    tracing::info!("No links at offset {}, stopping after this batch", cursor);
                    self.transition(CrawlPhase::PageExhausted);
                    break true;
                }
                self.stats.links_found += links.len() as u64;

                for link in &links {
                    self.transition(CrawlPhase::ExtractingRecord);
                    match self.extractor.extract(link).await {
                        Some(record) => {
                            self.stats.records_extracted += 1;
                            batch.push(record);
                        }
                        None => self.stats.listings_skipped += 1,
                    }
                    pause(self.listing_delay()).await;
                }

                cursor += self.page_size;
                pages_in_batch += 1;
                pause(self.pacing.request_delay()).await;
                self.transition(CrawlPhase::AdvancingPage);
            };

            if batch.is_empty() {
                tracing::info!("Batch is empty, crawl finished");
                self.transition(CrawlPhase::Done);
                break;
            }

            self.transition(CrawlPhase::Persisting);
            batch_number += 1;
            self.persist(&batch, batch_number);
            all_records.extend(batch);

            if exhausted || cursor >= budget {
                self.transition(CrawlPhase::Done);
                break;
            }

            self.transition(CrawlPhase::Pausing);
            tracing::info!(
                "Pausing for {} seconds before next batch...",
                self.pacing.batch_pause().as_secs_f64()
            );
            pause(self.pacing.batch_pause()).await;
            self.transition(CrawlPhase::AdvancingPage);
        }

        debug_assert!(self.phase.is_terminal());
        tracing::info!(
            "Crawl finished: {} records in {} batches",
            all_records.len(),
            self.stats.batches_persisted
        );

        all_records
    }

    /// Hands a batch to the sink; a failed write is logged, not propagated
    fn persist(&mut self, batch: &[JobRecord], batch_number: u32) {
        match self.sink.persist(batch, Some(batch_number)) {
            Ok(path) => {
                self.stats.batches_persisted += 1;
                self.stats.files_written.push(path);
            }
            Err(e) => {
                self.stats.persist_failures += 1;
                tracing::error!(
                    component = "sink",
                    batch = batch_number,
                    records = batch.len(),
                    "Failed to persist batch: {}",
                    e
                );
            }
        }
    }

    /// Delay after each listing: the fixed delay plus random jitter
    fn listing_delay(&self) -> Duration {
        jittered(self.pacing.request_delay(), self.pacing.jitter_ms)
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "Invalid crawl phase transition: {} -> {}",
            self.phase,
            next
        );
        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Adds a uniformly random jitter in `[0, jitter_ms)` to `base`
fn jittered(base: Duration, jitter_ms: u64) -> Duration {
    if jitter_ms == 0 {
        return base;
    }
    base + Duration::from_millis(rand::random_range(0..jitter_ms))
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
