//! State module for tracking crawl progress
//!
//! - `CrawlPhase`: the phase the batch crawler is currently in

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
