//! Field extractor for individual job listings
//!
//! Each structured field is described by an ordered list of selector
//! strategies. Strategies are tried in turn and the first one producing
//! non-empty text wins; when all of them miss, the field gets the sentinel.
//! The usual shape of a chain is:
//!
//! 1. a strict tag or exact class selector
//! 2. a loose keyword-in-class-name selector (case-insensitive)
//! 3. a generic structural fallback such as a heading
//! 4. the sentinel
//!
//! The two sub-page fields ("dein job", "dein profil") are filled by locating
//! an anchor by its visible text and handing its target to the
//! [`SubLinkFollower`].

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::follower::SubLinkFollower;
use crate::crawler::links::resolve_href;
use crate::crawler::text::{class_contains, visible_text};
use crate::record::{or_sentinel, JobRecord, ListingLink, SENTINEL};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Structured fields read directly from the listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    Location,
    Salary,
    PostedDate,
}

/// One way of locating a field's element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Any element with this tag name
    Tag(&'static str),
    /// Any element carrying exactly this class
    Class(&'static str),
    /// Any element whose class attribute contains this keyword, ignoring case
    ClassContains(&'static str),
}

impl Strategy {
    /// Returns the text of the first matching element with non-empty text
    pub fn apply(&self, document: &Html) -> Option<String> {
        let selector = match self {
            Self::Tag(tag) => Selector::parse(tag).ok(),
            Self::Class(class) => Selector::parse(&format!(".{}", class)).ok(),
            Self::ClassContains(_) => Selector::parse("[class]").ok(),
        }?;

        document
            .select(&selector)
            .filter(|element| match self {
                Self::ClassContains(keyword) => class_contains(*element, keyword),
                _ => true,
            })
            .map(visible_text)
            .find(|text| !text.is_empty())
    }
}

/// The ordered fallback chain for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub strategies: &'static [Strategy],
}

impl FieldRule {
    /// Runs the chain, returning the sentinel when every strategy misses
    pub fn extract(&self, document: &Html) -> String {
        or_sentinel(
            self.strategies
                .iter()
                .find_map(|strategy| strategy.apply(document)),
        )
    }
}

const FIELD_RULES: [FieldRule; 5] = [
    // the page heading is the strict selector for the title
    FieldRule {
        field: Field::Title,
        strategies: &[Strategy::Tag("h1"), Strategy::ClassContains("title")],
    },
    FieldRule {
        field: Field::Company,
        strategies: &[
            Strategy::Class("company-name"),
            Strategy::ClassContains("employer"),
            Strategy::Tag("h2"),
        ],
    },
    FieldRule {
        field: Field::Location,
        strategies: &[
            Strategy::Class("job-location"),
            Strategy::ClassContains("location"),
        ],
    },
    FieldRule {
        field: Field::Salary,
        strategies: &[Strategy::Class("salary"), Strategy::ClassContains("gehalt")],
    },
    FieldRule {
        field: Field::PostedDate,
        strategies: &[
            Strategy::Class("posting-date"),
            Strategy::ClassContains("date"),
        ],
    },
];

/// The fallback chains used for every listing page
pub fn field_rules() -> &'static [FieldRule] {
    &FIELD_RULES
}

/// Anchor phrase leading to the "your job" sub-page
pub const DEIN_JOB_PHRASE: &str = "dein job";

/// Anchor phrase leading to the "your profile" sub-page
pub const DEIN_PROFIL_PHRASE: &str = "dein profil";

/// Everything read from a listing page without further requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub posted_date: String,
    /// Absolute target of the "dein job" anchor, if present
    pub dein_job_link: Option<String>,
    /// Absolute target of the "dein profil" anchor, if present
    pub dein_profil_link: Option<String>,
}

/// Parses a listing page into its structured fields and sub-page links
///
/// Relative anchor targets are resolved against `host`.
pub fn extract_fields(html: &str, host: &Url) -> ExtractedFields {
    let document = Html::parse_document(html);

    let field = |wanted: Field| {
        FIELD_RULES
            .iter()
            .find(|rule| rule.field == wanted)
            .map(|rule| rule.extract(&document))
            .unwrap_or_else(|| SENTINEL.to_string())
    };

    ExtractedFields {
        title: field(Field::Title),
        company: field(Field::Company),
        location: field(Field::Location),
        salary: field(Field::Salary),
        posted_date: field(Field::PostedDate),
        dein_job_link: find_anchor_target(&document, DEIN_JOB_PHRASE, host),
        dein_profil_link: find_anchor_target(&document, DEIN_PROFIL_PHRASE, host),
    }
}

/// Locates the first anchor whose text contains `phrase` (any case) and
/// resolves its href
///
/// Only the first matching anchor is considered; if it has no usable href
/// the result is None.
fn find_anchor_target(document: &Html, phrase: &str, host: &Url) -> Option<String> {
    let selector = Selector::parse("a").ok()?;

    let anchor = document
        .select(&selector)
        .find(|a| visible_text(*a).to_lowercase().contains(phrase))?;

    let href = anchor.value().attr("href")?;
    resolve_href(href, host)
}

/// Turns listing links into job records
pub struct FieldExtractor {
    client: Client,
    host: Url,
    follower: SubLinkFollower,
}

impl FieldExtractor {
    /// Creates an extractor resolving relative links against `host`
    pub fn new(client: Client, host: &str) -> Result<Self, url::ParseError> {
        let host = Url::parse(host)?;
        Ok(Self {
            follower: SubLinkFollower::new(client.clone()),
            client,
            host,
        })
    }

    /// Absolute address of a listing link
    pub fn resolve(&self, link: &ListingLink) -> Option<String> {
        resolve_href(link.as_str(), &self.host)
    }

    /// Fetches a listing and builds its record
    ///
    /// Returns None when the listing page itself cannot be fetched; sub-page
    /// failures only put the sentinel into their own field.
    pub async fn extract(&self, link: &ListingLink) -> Option<JobRecord> {
        let Some(url) = self.resolve(link) else {
            tracing::warn!(
                component = "extractor",
                href = %link,
                "Skipping listing with unusable href"
            );
            return None;
        };

        tracing::info!("Scraping job details: {}", url);

        let body = match fetch_url(&self.client, &url).await {
            FetchResult::Page {
                final_url, body, ..
            } => {
                if final_url != url {
                    tracing::debug!("Listing {} redirected to {}", url, final_url);
                }
                body
            }
            failure => {
                tracing::warn!(
                    component = "extractor",
                    url = %url,
                    "Failed to fetch listing: {}",
                    failure
                );
                return None;
            }
        };

        let fields = extract_fields(&body, &self.host);

        let dein_job = self
            .follow(fields.dein_job_link.as_deref(), DEIN_JOB_PHRASE)
            .await;
        let dein_profil = self
            .follow(fields.dein_profil_link.as_deref(), DEIN_PROFIL_PHRASE)
            .await;

        Some(JobRecord {
            title: fields.title,
            company: fields.company,
            location: fields.location,
            salary: fields.salary,
            posted_date: fields.posted_date,
            url,
            dein_job,
            dein_profil,
        })
    }

    async fn follow(&self, target: Option<&str>, phrase: &str) -> String {
        match target {
            Some(address) => {
                tracing::info!("Found '{}' link: {}", phrase, address);
                self.follower.snippet(address).await
            }
            None => {
                tracing::debug!("No '{}' link on page", phrase);
                SENTINEL.to_string()
            }
        }
    }
}
