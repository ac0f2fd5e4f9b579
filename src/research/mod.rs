pub mod search;
pub mod synthesis;

pub use search::{SearchProvider, SearchResult, TavilyClient};
pub use synthesis::{GeminiClient, ProfileSynthesizer, RetryPolicy};

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::crawler::Crawler;
use crate::error::{ReconciliationError, ResearchError};
use crate::models::{ResearchOptions, ResearchReport};
use crate::signals::{CompanyInfo, ContactExtractor, FinancialExtractor};
use crate::valuation::ValuationReconciler;
use synthesis::{build_synthesis_prompt, clean_json_response};

/// Runs one full research pass: crawl, signal extraction, optional
/// external research, valuation reconciliation and optional synthesis.
/// Each run is stateless and independent; collaborator clients are
/// injected so the core never reads credentials itself.
pub struct ResearchAgent {
    crawler: Crawler,
    contacts: ContactExtractor,
    financial: FinancialExtractor,
    reconciler: ValuationReconciler,
    search: Option<Box<dyn SearchProvider>>,
    synthesizer: Option<Box<dyn ProfileSynthesizer>>,
    corpus_char_limit: usize,
    search_query_delay_ms: u64,
}

impl ResearchAgent {
    pub fn new(config: &Config) -> Self {
        Self {
            crawler: Crawler::new(config.crawl.clone()),
            contacts: ContactExtractor::new(),
            financial: FinancialExtractor::new(),
            reconciler: ValuationReconciler::new(),
            search: None,
            synthesizer: None,
            corpus_char_limit: config.crawl.corpus_char_limit,
            search_query_delay_ms: config.external.search_query_delay_ms,
        }
    }

    pub fn with_search(mut self, provider: Box<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Box<dyn ProfileSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub async fn research(
        &self,
        url: &str,
        options: &ResearchOptions,
    ) -> Result<ResearchReport, ResearchError> {
        info!("🔍 Researching {}", url);

        let crawl = self.crawler.crawl(url).await?;
        let contact_signals = self
            .contacts
            .extract_contact_signals(&crawl.aggregated_text, &crawl.base_html);

        let mut metrics = self.financial.extract_financial_metrics(&crawl.aggregated_text);
        let mut combined_text = crawl.aggregated_text.clone();

        let mut external_results = Vec::new();
        if options.include_external {
            if let Some(provider) = &self.search {
                external_results = self
                    .external_research(provider.as_ref(), &crawl.company_name)
                    .await;
                let external_text = external_results
                    .iter()
                    .map(|r| r.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                if !external_text.is_empty() {
                    metrics.merge(self.financial.extract_financial_metrics(&external_text));
                    combined_text.push('\n');
                    combined_text.push_str(&external_text);
                }
            }
        }

        let company_info = CompanyInfo::from_text(&self.financial, &combined_text);
        let valuation = match self.reconciler.reconcile(&metrics, &company_info) {
            Ok(estimate) => Some(estimate),
            Err(ReconciliationError::InsufficientData) => {
                info!("No usable valuation inputs for {}", crawl.company_name);
                None
            }
        };

        let mut report = ResearchReport {
            id: Uuid::new_v4().to_string(),
            base_url: crawl.base_url,
            company_name: crawl.company_name,
            content: crawl
                .aggregated_text
                .chars()
                .take(self.corpus_char_limit)
                .collect(),
            contact_signals,
            scraped_pages_count: crawl.scraped_pages_count,
            external_source_count: external_results.len(),
            valuation,
            profile: None,
            completed_at: Utc::now(),
        };

        if let Some(synthesizer) = &self.synthesizer {
            let profile = self
                .synthesize_profile(synthesizer.as_ref(), &report, &external_results)
                .await;
            report.profile = profile;
        }

        info!(
            "✅ Research complete for {}: {} pages, {} external sources",
            report.company_name, report.scraped_pages_count, report.external_source_count
        );
        Ok(report)
    }

    /// Three fixed queries per run; individual query failures are logged
    /// and skipped so external research degrades instead of aborting.
    async fn external_research(
        &self,
        provider: &dyn SearchProvider,
        company_name: &str,
    ) -> Vec<SearchResult> {
        let queries = [
            format!("{} company funding valuation", company_name),
            format!("{} founders executives leadership", company_name),
            format!("{} products services business model", company_name),
        ];

        let mut results = Vec::new();
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(self.search_query_delay_ms)).await;
            }
            match provider.search(query).await {
                Ok(batch) => results.extend(batch),
                Err(e) => warn!("External search failed for {:?}: {}", query, e),
            }
        }

        info!("External research returned {} results", results.len());
        results
    }

    /// A malformed model response degrades to a report without a profile;
    /// the evidence sections stand on their own.
    async fn synthesize_profile(
        &self,
        synthesizer: &dyn ProfileSynthesizer,
        report: &ResearchReport,
        external: &[SearchResult],
    ) -> Option<serde_json::Value> {
        let evidence = serde_json::to_string_pretty(report).ok()?;
        let external_json = serde_json::to_string_pretty(external).ok()?;
        let prompt = build_synthesis_prompt(&evidence, &external_json);

        match synthesizer.synthesize(&prompt).await {
            Ok(raw) => {
                let cleaned = clean_json_response(&raw);
                match serde_json::from_str(&cleaned) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!("Synthesized profile was not valid JSON: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                warn!("Profile synthesis failed: {}", e);
                None
            }
        }
    }
}
