//! Integration tests for Stellenwerk-Crawler
//!
//! These tests run the real HTTP client against wiremock servers.

mod crawl_tests;
