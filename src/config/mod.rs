//! Configuration module for Stellenwerk-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults that reproduce the stock Stellenwerk Hamburg crawl,
//! so a configuration file is optional.
//!
//! # Example
//!
//! ```no_run
//! use stellenwerk_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will visit up to {} pages", config.pacing.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, PacingConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
