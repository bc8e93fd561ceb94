use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Stellenwerk-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Address of the paginated index page
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Origin used to resolve relative listing and sub-page links
    pub host: String,

    /// Substring an href must contain to count as a listing link
    #[serde(rename = "listing-marker")]
    pub listing_marker: String,

    /// Substrings that disqualify an otherwise matching href
    #[serde(rename = "excluded-markers")]
    pub excluded_markers: Vec<String>,

    /// Name of the zero-based record offset query parameter
    #[serde(rename = "pagination-param")]
    pub pagination_param: String,

    /// Number of listings per index page; the offset advances by this much
    #[serde(rename = "page-size")]
    pub page_size: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.stellenwerk.de/hamburg".to_string(),
            host: "https://www.stellenwerk.de".to_string(),
            listing_marker: "/hamburg/".to_string(),
            excluded_markers: vec![
                "account".to_string(),
                "login".to_string(),
                "register".to_string(),
            ],
            pagination_param: "pagination[start]".to_string(),
            page_size: 10,
        }
    }
}

/// Request identification and transport limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Browser-like User-Agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Referer header value
    pub referer: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://www.stellenwerk.de/".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Crawl pacing and page budget
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Fixed delay after each listing and after each index page (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Upper bound of the random jitter added after each listing (milliseconds)
    #[serde(rename = "jitter-ms")]
    pub jitter_ms: u64,

    /// Number of index pages grouped into one persisted batch
    #[serde(rename = "batch-size")]
    pub batch_size: u32,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-pause-ms")]
    pub batch_pause_ms: u64,

    /// Maximum number of index pages to visit
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl PacingConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    /// Pacing with every sleep set to zero
    pub fn immediate(batch_size: u32, max_pages: u32) -> Self {
        Self {
            request_delay_ms: 0,
            jitter_ms: 0,
            batch_size,
            batch_pause_ms: 0,
            max_pages,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 3000,
            jitter_ms: 1000,
            batch_size: 5,
            batch_pause_ms: 10_000,
            max_pages: 40,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives the batch CSV files
    pub directory: PathBuf,

    /// Leading part of every output file name
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "stellenwerk_jobs".to_string(),
        }
    }
}
