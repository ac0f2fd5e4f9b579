use thiserror::Error;

/// Transport-level failure for a single page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("network failure fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    NonOkStatus { url: String, status: u16 },

    #[error("{url} body exceeds the {limit_bytes} byte limit")]
    BodyTooLarge { url: String, limit_bytes: usize },
}

/// Failure of a whole crawl. Secondary-page failures are swallowed by the
/// coordinator and never surface here.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid base URL {0:?}: must be absolute with scheme and host")]
    InvalidBaseUrl(String),

    #[error("base page fetch failed: {0}")]
    BasePage(#[from] FetchError),
}

/// Valuation reconciliation outcome when no methodology has usable inputs.
/// An expected result, not a crash: callers null the financial fields and
/// continue.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("insufficient financial data for any valuation methodology")]
    InsufficientData,
}

/// Top-level failure for a research run.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("search provider request failed: {0}")]
    Search(String),

    #[error("synthesis request failed: {0}")]
    Synthesis(String),
}
