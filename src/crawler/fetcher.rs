//! Page fetching
//!
//! One shared `reqwest` client carries the fixed browser-like headers. Every
//! GET is reduced to a [`FetchResult`] so callers decide how a failure
//! degrades: an empty link list, a skipped listing, or the sentinel.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::fmt;

/// Outcome of fetching one page
#[derive(Debug)]
pub enum FetchResult {
    /// A 2xx response with a readable body
    Page {
        /// Address the body was served from, after redirects
        final_url: String,
        status_code: u16,
        body: String,
    },

    /// The server answered, but not with 2xx
    Rejected { status_code: u16 },

    /// No usable response: timeout, refused connection, broken body
    Unreachable { reason: String },
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page { status_code, .. } | Self::Rejected { status_code } => {
                write!(f, "HTTP {}", status_code)
            }
            Self::Unreachable { reason } => f.write_str(reason),
        }
    }
}

/// Builds the client shared by the scanner, the extractor and the follower
///
/// User agent, accept-language and referer never change after this point.
/// Header values were checked by config validation; one that still fails to
/// convert is left out rather than aborting the crawl.
///
/// ```no_run
/// use stellenwerk_crawler::config::HttpConfig;
/// use stellenwerk_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let fixed: [(HeaderName, &str); 2] = [
        (ACCEPT_LANGUAGE, &config.accept_language),
        (REFERER, &config.referer),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in fixed {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::warn!("Dropping unusable {} header: {:?}", name, value),
        }
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// GETs `url` and classifies the outcome; never fails with `Err`
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return unreachable_from(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::Rejected {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Page {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => unreachable_from(&e),
    }
}

fn unreachable_from(error: &reqwest::Error) -> FetchResult {
    let reason = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };
    FetchResult::Unreachable { reason }
}
