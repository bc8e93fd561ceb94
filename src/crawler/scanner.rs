//! Listing-page scanner
//!
//! Fetches one page of the paginated index and returns the listing links it
//! contains, deduplicated in first-seen order.

use crate::config::SiteConfig;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::record::ListingLink;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Scans index pages for listing links
pub struct ListingScanner {
    client: Client,
    base_url: Url,
    site: SiteConfig,
}

impl ListingScanner {
    /// Creates a scanner for the index at `site.base_url`
    pub fn new(client: Client, site: SiteConfig) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&site.base_url)?;
        Ok(Self {
            client,
            base_url,
            site,
        })
    }

    /// Address of the index page starting at record `offset`
    ///
    /// # Example
    ///
    /// ```
    /// use stellenwerk_crawler::config::SiteConfig;
    /// use stellenwerk_crawler::crawler::ListingScanner;
    ///
    /// let scanner = ListingScanner::new(reqwest::Client::new(), SiteConfig::default()).unwrap();
    /// assert_eq!(
    ///     scanner.index_url(20).as_str(),
    ///     "https://www.stellenwerk.de/hamburg?pagination%5Bstart%5D=20"
    /// );
    /// ```
    pub fn index_url(&self, offset: u64) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.site.pagination_param, &offset.to_string());
        url
    }

    /// One-based page number of `offset`, for progress lines
    fn page_number(&self, offset: u64) -> u64 {
        offset
            .checked_div(u64::from(self.site.page_size))
            .map_or(1, |page| page + 1)
    }

    /// Fetches the index page at `offset` and returns its listing links
    ///
    /// Performs exactly one request. A failed fetch is logged and yields an
    /// empty list, which the caller treats as the end of the results.
    pub async fn scan(&self, offset: u64) -> Vec<ListingLink> {
        let url = self.index_url(offset);
        tracing::info!("Scanning page {}: {}", self.page_number(offset), url);

        let body = match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Page { body, .. } => body,
            failure => {
                tracing::warn!(
                    component = "scanner",
                    url = %url,
                    "Failed to fetch index page: {}",
                    failure
                );
                return Vec::new();
            }
        };

        let links = extract_listing_links(&body, &self.site);
        tracing::info!("Found {} job links", links.len());
        links
    }
}

/// Extracts the distinct listing links from an index page
///
/// An anchor qualifies when its href contains `site.listing_marker` and none
/// of `site.excluded_markers`. Duplicates are dropped by exact href equality;
/// the survivors keep the order in which they first appear.
pub fn extract_listing_links(html: &str, site: &SiteConfig) -> Vec<ListingLink> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut matches = 0usize;

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !href.contains(site.listing_marker.as_str()) {
            continue;
        }

        if site
            .excluded_markers
            .iter()
            .any(|marker| href.contains(marker.as_str()))
        {
            continue;
        }

        matches += 1;
        if seen.insert(href) {
            links.push(ListingLink::new(href));
        }
    }

    tracing::debug!(
        "Kept {} distinct listing links out of {} matches",
        links.len(),
        matches
    );

    links
}
