//! Output module for persisting extracted records
//!
//! This module handles:
//! - The sink interface batches are handed to
//! - Writing each batch to its own CSV file
//! - Recording crawl statistics

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{batch_file_name, CsvSink};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};
