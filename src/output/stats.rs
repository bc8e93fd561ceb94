//! Crawl statistics
//!
//! Counters the batch crawler keeps while it runs, and a console report.

use std::path::PathBuf;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Index pages requested
    pub pages_scanned: u64,

    /// Distinct listing links returned across all index pages
    pub links_found: u64,

    /// Listings turned into records
    pub records_extracted: u64,

    /// Listings whose page could not be fetched
    pub listings_skipped: u64,

    /// Batches handed to the sink successfully
    pub batches_persisted: u64,

    /// Batches the sink failed to write
    pub persist_failures: u64,

    /// Files written, in batch order
    pub files_written: Vec<PathBuf>,
}

impl CrawlStatistics {
    /// Share of listings that produced a record, in percent
    pub fn extraction_rate(&self) -> f64 {
        let attempted = self.records_extracted + self.listings_skipped;
        if attempted == 0 {
            0.0
        } else {
            (self.records_extracted as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Index pages scanned: {}", stats.pages_scanned);
    println!("  Listing links found: {}", stats.links_found);
    println!("  Records extracted: {}", stats.records_extracted);
    println!("  Listings skipped: {}", stats.listings_skipped);
    println!();

    println!("Batches:");
    println!("  Persisted: {}", stats.batches_persisted);
    if stats.persist_failures > 0 {
        println!("  Failed to write: {}", stats.persist_failures);
    }
    for file in &stats.files_written {
        println!("  - {}", file.display());
    }
    println!();

    println!(
        "Extraction Rate: {:.1}% ({} / {} listings)",
        stats.extraction_rate(),
        stats.records_extracted,
        stats.records_extracted + stats.listings_skipped
    );
}
