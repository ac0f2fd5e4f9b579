use serde::{Deserialize, Serialize};

use crate::signals::financial::FinancialExtractor;

/// A known comparable company. Valuations are raw dollars; `size_ratio`
/// is the competitor's size relative to the subject (1.0 = same size).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub valuation: Option<f64>,
    /// ISO date the valuation was observed, when known.
    pub valuation_date: Option<String>,
    pub size_ratio: f64,
}

/// Industry metadata for one research run, derived once from the combined
/// corpus. Competitors are supplied by the caller; the pipeline does not
/// fabricate comparables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub industry: Option<String>,
    /// Fraction, e.g. 0.35 = 35% growth.
    pub growth_rate: Option<f64>,
    pub competitors: Vec<Competitor>,
}

impl CompanyInfo {
    pub fn from_text(extractor: &FinancialExtractor, text: &str) -> Self {
        Self {
            industry: extractor.extract_industry(text),
            growth_rate: extractor.extract_growth_rate(text),
            competitors: Vec::new(),
        }
    }

    pub fn with_competitors(mut self, competitors: Vec<Competitor>) -> Self {
        self.competitors = competitors;
        self
    }
}
