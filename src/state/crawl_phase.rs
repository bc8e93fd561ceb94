//! Phase definitions for the batch crawler
//!
//! The crawler moves through these phases for every index page and every
//! batch; `Done` is the only terminal phase.

use std::fmt;

/// Represents the phase the batch crawler is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Page Loop =====
    /// Deciding whether another index page fits in the batch and page budget
    AdvancingPage,

    /// Scanning the index page at the current cursor
    FetchingLinks,

    /// Extracting a record from one listing link
    ExtractingRecord,

    // ===== Batch Boundaries =====
    /// The batch's page budget (or the overall page budget) is used up
    BatchFull,

    /// An index page yielded no links
    PageExhausted,

    /// Handing the batch to the persistence sink
    Persisting,

    /// Sleeping between batches
    Pausing,

    // ===== Terminal =====
    /// The crawl has finished
    Done,
}

impl CrawlPhase {
    /// Returns true if no further phase can follow
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        match self {
            AdvancingPage => matches!(next, FetchingLinks | BatchFull),
            FetchingLinks => matches!(next, ExtractingRecord | PageExhausted),
            ExtractingRecord => matches!(next, ExtractingRecord | AdvancingPage),
            BatchFull | PageExhausted => matches!(next, Persisting | Done),
            Persisting => matches!(next, Pausing | Done),
            Pausing => matches!(next, AdvancingPage),
            Done => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdvancingPage => "advancing_page",
            Self::FetchingLinks => "fetching_links",
            Self::ExtractingRecord => "extracting_record",
            Self::BatchFull => "batch_full",
            Self::PageExhausted => "page_exhausted",
            Self::Persisting => "persisting",
            Self::Pausing => "pausing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
