use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};
use url::Url;

use crate::crawler::content::ContentExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::links::LinkClassifier;
use crate::crawler::types::{CrawlConfig, CrawlResult, PageContent};
use crate::error::CrawlError;

/// Orchestrates fetcher, content extractor and link classifier under a page
/// budget and per-request rate limit.
pub struct Crawler {
    fetcher: PageFetcher,
    extractor: ContentExtractor,
    classifier: LinkClassifier,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(config.fetch_timeout_seconds, config.max_body_bytes),
            extractor: ContentExtractor::new(),
            classifier: LinkClassifier::new(),
            config,
        }
    }

    /// Crawls the base URL plus up to `max_pages - 1` relevant same-domain
    /// pages. Base-page failure is fatal; secondary-page failures are
    /// skipped. Exceeding the overall deadline returns the pages fetched
    /// so far.
    pub async fn crawl(&self, base_url: &str) -> Result<CrawlResult, CrawlError> {
        let started = Instant::now();
        let deadline = self.config.overall_deadline_ms.map(Duration::from_millis);

        let base = parse_base_url(base_url)?;
        info!("🕷️  Starting crawl of {} (budget {})", base, self.config.max_pages);

        let base_page = self.fetcher.fetch(base.as_str()).await?;
        let company_name = self
            .extractor
            .extract_company_name(base.as_str(), &base_page.body);

        let mut pages = vec![PageContent {
            url: base_page.url.clone(),
            text: self.extractor.extract_text(&base_page.body),
            extracted_at: Utc::now(),
        }];

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(base.to_string());

        let budget = self.config.max_pages.saturating_sub(1);
        let candidates = self
            .classifier
            .select_relevant_links(&base, &base_page.body, budget);

        for url in candidates {
            if let Some(limit) = deadline {
                if started.elapsed() >= limit {
                    warn!("Crawl deadline reached, returning {} pages", pages.len());
                    break;
                }
            }
            if !visited.insert(url.clone()) {
                continue;
            }

            // Rate limiting against the target host.
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;

            match self.fetcher.fetch(&url).await {
                Ok(page) => {
                    pages.push(PageContent {
                        url: page.url,
                        text: self.extractor.extract_text(&page.body),
                        extracted_at: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                }
            }
        }

        let aggregated_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let scraped_pages_count = pages.len();

        info!(
            "🎯 Crawl complete for {}: {} pages, {} chars of corpus in {}ms",
            base,
            scraped_pages_count,
            aggregated_text.chars().count(),
            started.elapsed().as_millis()
        );

        Ok(CrawlResult {
            base_url: base.to_string(),
            pages,
            company_name,
            aggregated_text,
            scraped_pages_count,
            base_html: base_page.body,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(raw).map_err(|_| CrawlError::InvalidBaseUrl(raw.to_string()))?;
    if url.host_str().is_none() || !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}
