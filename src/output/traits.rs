//! Output handler traits and errors
//!
//! This module defines the trait interface through which the batch crawler
//! hands finished batches to a persistence backend.

use crate::record::JobRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for persisted batches
///
/// Every call receives one complete batch and must produce an independent
/// artifact; nothing is appended to or merged with earlier batches.
pub trait RecordSink {
    /// Persists `batch` and returns the path of the written file
    ///
    /// `batch_number` is None for an unbatched save.
    fn persist(&mut self, batch: &[JobRecord], batch_number: Option<u32>)
        -> OutputResult<PathBuf>;
}
