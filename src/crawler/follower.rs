//! Sub-link follower
//!
//! Fetches a linked sub-page ("dein job", "dein profil") and reduces it to a
//! short text snippet. Failures never propagate: they become the sentinel.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::text::{class_contains, truncate_chars, visible_text};
use crate::record::{or_sentinel, SENTINEL};
use reqwest::Client;
use scraper::{Html, Selector};

/// Maximum snippet length in characters
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Follows sub-page links and returns text snippets
#[derive(Clone)]
pub struct SubLinkFollower {
    client: Client,
}

impl SubLinkFollower {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `address` and returns at most 200 characters of its text
    ///
    /// Returns the sentinel if the fetch fails or the page has no text.
    pub async fn snippet(&self, address: &str) -> String {
        tracing::info!("Scraping click page: {}", address);

        match fetch_url(&self.client, address).await {
            FetchResult::Page { body, .. } => or_sentinel(snippet_from_html(&body)),
            failure => {
                tracing::warn!(
                    component = "follower",
                    url = %address,
                    "Failed to fetch sub-page: {}",
                    failure
                );
                SENTINEL.to_string()
            }
        }
    }
}

/// Reduces a sub-page to its snippet text
///
/// Prefers the first `div` whose class mentions "description" (any case);
/// falls back to the visible text of the whole page. The result is cut to
/// [`SNIPPET_MAX_CHARS`] characters. Returns None when no text remains.
pub fn snippet_from_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let description = Selector::parse("div[class]").ok().and_then(|selector| {
        document
            .select(&selector)
            .find(|element| class_contains(*element, "description"))
    });

    let content = match description {
        Some(element) => visible_text(element),
        None => visible_text(document.root_element()),
    };

    let snippet = truncate_chars(&content, SNIPPET_MAX_CHARS);
    if snippet.trim().is_empty() {
        None
    } else {
        Some(snippet)
    }
}
