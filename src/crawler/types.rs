use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully fetched page, reduced to plain text. Immutable once
/// produced; owned by the crawl that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub text: String,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub base_url: String,
    pub pages: Vec<PageContent>,
    pub company_name: String,
    /// Newline-joined text of every fetched page, uncapped. Downstream
    /// payload builders apply their own length ceiling.
    pub aggregated_text: String,
    pub scraped_pages_count: usize,
    /// Raw markup of the base page, kept so social-link and title
    /// extraction never re-fetch.
    #[serde(skip)]
    pub base_html: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    pub max_pages: usize,
    /// Inter-request delay against a single host. A deliberate rate limit,
    /// not an incidental sleep.
    pub request_delay_ms: u64,
    pub fetch_timeout_seconds: u64,
    pub max_body_bytes: usize,
    /// Ceiling on corpus text handed to LLM-facing payloads. Prefix kept,
    /// remainder dropped.
    pub corpus_char_limit: usize,
    /// Overall wall-clock budget for one crawl. When exceeded the crawl
    /// stops and returns the pages fetched so far.
    pub overall_deadline_ms: Option<u64>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            request_delay_ms: 1000,
            fetch_timeout_seconds: 25,
            max_body_bytes: 5_000_000,
            corpus_char_limit: 8000,
            overall_deadline_ms: None,
        }
    }
}
