use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signals::ContactSignals;
use crate::valuation::ValuationEstimate;

#[derive(Debug, Clone)]
pub struct ResearchOptions {
    pub include_external: bool,
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self {
            include_external: true,
        }
    }
}

/// JSON-serializable output of one research run, handed to the synthesis
/// collaborator and to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub id: String,
    pub base_url: String,
    pub company_name: String,
    /// Corpus prefix, capped for LLM-facing payloads.
    pub content: String,
    pub contact_signals: ContactSignals,
    pub scraped_pages_count: usize,
    pub external_source_count: usize,
    pub valuation: Option<ValuationEstimate>,
    /// Synthesized profile, when a synthesizer was configured and its
    /// response parsed.
    pub profile: Option<serde_json::Value>,
    pub completed_at: DateTime<Utc>,
}
