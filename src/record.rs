//! Listing links and extracted job records

use std::fmt;

/// Placeholder for any field whose extraction failed
pub const SENTINEL: &str = "N/A";

/// Header row of every output file, in column order
pub const CSV_HEADER: [&str; 8] = [
    "Title",
    "Company",
    "Location",
    "Salary",
    "Posted Date",
    "URL",
    "Dein Job",
    "Dein Profil",
];

/// An href identifying one job posting, as found on an index page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingLink(String);

impl ListingLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingLink {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

/// One extracted job posting
///
/// Every field holds either extracted text or [`SENTINEL`]; `url` is always
/// the absolute address the listing was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub posted_date: String,
    pub url: String,
    pub dein_job: String,
    pub dein_profil: String,
}

impl JobRecord {
    /// A record for `url` with every other field set to the sentinel
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self {
            title: SENTINEL.to_string(),
            company: SENTINEL.to_string(),
            location: SENTINEL.to_string(),
            salary: SENTINEL.to_string(),
            posted_date: SENTINEL.to_string(),
            url: url.into(),
            dein_job: SENTINEL.to_string(),
            dein_profil: SENTINEL.to_string(),
        }
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.title,
            &self.company,
            &self.location,
            &self.salary,
            &self.posted_date,
            &self.url,
            &self.dein_job,
            &self.dein_profil,
        ]
    }
}

/// Returns `value` unless it is blank, in which case the sentinel
pub fn or_sentinel(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| SENTINEL.to_string())
}
