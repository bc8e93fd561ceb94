//! CSV persistence sink
//!
//! Writes each batch to its own timestamped CSV file: a header row followed
//! by one row per record, in batch order.

use crate::config::OutputConfig;
use crate::output::traits::{OutputResult, RecordSink};
use crate::record::{JobRecord, CSV_HEADER};
use chrono::{Local, NaiveDateTime};
use std::fs::File;
use std::path::PathBuf;

/// Minute-precision timestamp embedded in file names
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Builds the output file name for a batch
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use stellenwerk_crawler::output::batch_file_name;
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 30, 0).unwrap();
/// assert_eq!(
///     batch_file_name("stellenwerk_jobs", Some(2), &at),
///     "stellenwerk_jobs_batch2_2024-01-01_10-30.csv"
/// );
/// assert_eq!(
///     batch_file_name("stellenwerk_jobs", None, &at),
///     "stellenwerk_jobs_2024-01-01_10-30.csv"
/// );
/// ```
pub fn batch_file_name(
    prefix: &str,
    batch_number: Option<u32>,
    timestamp: &NaiveDateTime,
) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    match batch_number {
        Some(n) => format!("{}_batch{}_{}.csv", prefix, n, stamp),
        None => format!("{}_{}.csv", prefix, stamp),
    }
}

/// Writes batches as CSV files into a directory
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
    file_prefix: String,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.directory.clone(), config.file_prefix.clone())
    }

    /// Persists `batch` under a name stamped with `timestamp`
    ///
    /// An existing file with the same name is replaced.
    pub fn persist_at(
        &self,
        batch: &[JobRecord],
        batch_number: Option<u32>,
        timestamp: &NaiveDateTime,
    ) -> OutputResult<PathBuf> {
        let path = self
            .directory
            .join(batch_file_name(&self.file_prefix, batch_number, timestamp));

        let file = File::create(&path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record(CSV_HEADER)?;
        for record in batch {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;

        tracing::info!("Saved {} jobs to {}", batch.len(), path.display());

        Ok(path)
    }
}

impl RecordSink for CsvSink {
    fn persist(
        &mut self,
        batch: &[JobRecord],
        batch_number: Option<u32>,
    ) -> OutputResult<PathBuf> {
        self.persist_at(batch, batch_number, &Local::now().naive_local())
    }
}
