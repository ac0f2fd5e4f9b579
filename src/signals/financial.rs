use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Missing dates compare as this sentinel, so "no date" is always older
/// than any real ISO date.
pub const MISSING_DATE_SENTINEL: &str = "0000-00-00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    MarketCap,
    Valuation,
    Funding,
    Revenue,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::MarketCap,
        MetricKind::Valuation,
        MetricKind::Funding,
        MetricKind::Revenue,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitScale {
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl UnitScale {
    pub fn multiplier(self) -> f64 {
        match self {
            UnitScale::Thousand => 1e3,
            UnitScale::Million => 1e6,
            UnitScale::Billion => 1e9,
            UnitScale::Trillion => 1e12,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "thousand" => Some(UnitScale::Thousand),
            "million" => Some(UnitScale::Million),
            "billion" => Some(UnitScale::Billion),
            "trillion" => Some(UnitScale::Trillion),
            _ => None,
        }
    }
}

/// One regex-matched financial figure with its scale, nearby date and
/// surrounding context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMention {
    pub kind: MetricKind,
    /// Numeric part as matched, e.g. "1.5". Scale lives next to it; the
    /// two only combine through [`FinancialMention::amount`].
    pub raw_value: String,
    pub scale: UnitScale,
    /// ISO date found near the match, when any.
    pub date: Option<String>,
    pub context: String,
}

impl FinancialMention {
    /// Canonical value in raw dollars. The only path from a mention into
    /// arithmetic; an unparseable numeric yields `None` and the mention is
    /// skipped, never aborting the batch.
    pub fn amount(&self) -> Option<f64> {
        let cleaned = self.raw_value.replace(',', "");
        let n: f64 = cleaned.parse().ok()?;
        if !n.is_finite() {
            return None;
        }
        Some(n * self.scale.multiplier())
    }

    pub fn date_key(&self) -> &str {
        self.date.as_deref().unwrap_or(MISSING_DATE_SENTINEL)
    }
}

/// Raw mentions per metric kind for one source document. Patterns populate
/// their kind's list independently, so duplicate and overlapping mentions
/// of the same underlying fact coexist; callers rank or merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialMetricsSet {
    mentions: BTreeMap<MetricKind, Vec<FinancialMention>>,
}

impl FinancialMetricsSet {
    pub fn push(&mut self, mention: FinancialMention) {
        self.mentions.entry(mention.kind).or_default().push(mention);
    }

    pub fn mentions_of(&self, kind: MetricKind) -> &[FinancialMention] {
        self.mentions.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Latest-dated mention of a kind that carries a parseable amount.
    /// Dates compare as ISO strings with missing dates as the sentinel.
    pub fn latest(&self, kind: MetricKind) -> Option<&FinancialMention> {
        self.mentions_of(kind)
            .iter()
            .filter(|m| m.amount().is_some())
            .max_by(|a, b| a.date_key().cmp(b.date_key()))
    }

    pub fn merge(&mut self, other: FinancialMetricsSet) {
        for (kind, mentions) in other.mentions {
            self.mentions.entry(kind).or_default().extend(mentions);
        }
    }

    pub fn total_mentions(&self) -> usize {
        self.mentions.values().map(Vec::len).sum()
    }
}

const SCALE_WORDS: &str = "thousand|million|billion|trillion";
const NUMBER: &str = r"([0-9][0-9,]*(?:\.[0-9]+)?)";

/// Pattern-based extraction of financial figures, growth rate and industry
/// from unstructured text.
pub struct FinancialExtractor {
    metric_patterns: Vec<(MetricKind, Vec<Regex>)>,
    iso_date_regex: Regex,
    month_date_regex: Regex,
    growth_patterns: Vec<Regex>,
    industry_patterns: Vec<Regex>,
}

impl FinancialExtractor {
    pub fn new() -> Self {
        let metric_patterns = MetricKind::ALL
            .iter()
            .map(|&kind| (kind, Self::patterns_for(kind)))
            .collect();

        Self {
            metric_patterns,
            iso_date_regex: Regex::new(r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}\b").unwrap(),
            month_date_regex: Regex::new(
                r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+([0-9]{1,2}),?\s+([0-9]{4})\b",
            )
            .unwrap(),
            growth_patterns: vec![
                Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*%\s+year[\s-]over[\s-]year\s+growth")
                    .unwrap(),
                Regex::new(r"(?i)grew\s+by\s+([0-9]+(?:\.[0-9]+)?)\s*%").unwrap(),
                Regex::new(r"(?i)growth\s+of\s+([0-9]+(?:\.[0-9]+)?)\s*%").unwrap(),
                Regex::new(r"(?i)increased\s+by\s+([0-9]+(?:\.[0-9]+)?)\s*%").unwrap(),
            ],
            industry_patterns: vec![
                Regex::new(r"industry:\s*([a-z0-9&/_-]+(?:\s+[a-z0-9&/_-]+){0,2})").unwrap(),
                Regex::new(r"sector:\s*([a-z0-9&/_-]+(?:\s+[a-z0-9&/_-]+){0,2})").unwrap(),
                Regex::new(r"we\s+are\s+an?\s+([a-z0-9&/_ -]+?)\s+company").unwrap(),
                Regex::new(r"leading\s+([a-z0-9&/_ -]+?)\s+company").unwrap(),
            ],
        }
    }

    /// Three surface shapes per kind: amount-then-keyword,
    /// keyword-then-amount, keyword with of/at then a bare amount.
    fn patterns_for(kind: MetricKind) -> Vec<Regex> {
        let keyword = match kind {
            MetricKind::MarketCap => r"market\s+cap(?:italization)?",
            MetricKind::Valuation => r"valuation|valued\s+at|worth",
            MetricKind::Funding => r"funding(?:\s+round)?|raised",
            MetricKind::Revenue => r"(?:annual\s+)?revenue|sales",
        };

        [
            format!(
                r"(?i)\${NUMBER}\s*({SCALE_WORDS})\s+(?:in\s+)?(?:{keyword})"
            ),
            format!(
                r"(?i)(?:{keyword})\s+(?:of|at|is|was|reached|:)?\s*\${NUMBER}\s*({SCALE_WORDS})"
            ),
            format!(
                r"(?i)(?:{keyword})\s+(?:of|at)\s+{NUMBER}\s*({SCALE_WORDS})"
            ),
        ]
        .into_iter()
        .map(|p| Regex::new(&p).unwrap())
        .collect()
    }

    /// Runs every pattern for every kind and unions all matches into the
    /// kind's mention list. Matches carry a date found within ±100 chars
    /// and a ±50-char context snippet.
    pub fn extract_financial_metrics(&self, text: &str) -> FinancialMetricsSet {
        let mut set = FinancialMetricsSet::default();

        for (kind, patterns) in &self.metric_patterns {
            for pattern in patterns {
                for caps in pattern.captures_iter(text) {
                    let (Some(whole), Some(value), Some(scale_word)) =
                        (caps.get(0), caps.get(1), caps.get(2))
                    else {
                        continue;
                    };
                    let Some(scale) = UnitScale::from_word(scale_word.as_str()) else {
                        continue;
                    };

                    let date = self.find_date_near(text, whole.start(), whole.end());
                    let context = window(text, whole.start(), whole.end(), 50)
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ");

                    set.push(FinancialMention {
                        kind: *kind,
                        raw_value: value.as_str().to_string(),
                        scale,
                        date,
                        context,
                    });
                }
            }
        }

        debug!("Extracted {} financial mentions", set.total_mentions());
        set
    }

    /// First percentage-plus-growth-keyword match across the pattern list,
    /// as a fraction. Never guesses.
    pub fn extract_growth_rate(&self, text: &str) -> Option<f64> {
        for pattern in &self.growth_patterns {
            if let Some(caps) = pattern.captures(text) {
                if let Some(value) = caps.get(1) {
                    if let Ok(pct) = value.as_str().parse::<f64>() {
                        return Some(pct / 100.0);
                    }
                }
            }
        }
        None
    }

    /// First industry/sector surface pattern match over lower-cased text.
    pub fn extract_industry(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        for pattern in &self.industry_patterns {
            if let Some(caps) = pattern.captures(&lowered) {
                if let Some(value) = caps.get(1) {
                    let trimmed = value.as_str().trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
            }
        }
        None
    }

    /// Searches ±100 chars around the match span for an ISO date, then a
    /// month-name date normalized to ISO.
    fn find_date_near(&self, text: &str, start: usize, end: usize) -> Option<String> {
        let nearby = window(text, start, end, 100);

        if let Some(m) = self.iso_date_regex.find(nearby) {
            return Some(m.as_str().to_string());
        }

        if let Some(caps) = self.month_date_regex.captures(nearby) {
            let rebuilt = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
            if let Ok(date) = NaiveDate::parse_from_str(&rebuilt, "%B %d %Y") {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }

        None
    }
}

impl Default for FinancialExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-width window around a byte span, clamped to char boundaries so
/// multibyte text never panics.
fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let lo = clamp_to_boundary(text, start.saturating_sub(radius));
    let hi = clamp_to_boundary(text, end.saturating_add(radius));
    &text[lo..hi]
}

fn clamp_to_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_cap_mention_with_iso_date() {
        let extractor = FinancialExtractor::new();
        let text = "The company reported a market cap of $1.5 billion as of 2023-06-15.";
        let set = extractor.extract_financial_metrics(text);

        let mentions = set.mentions_of(MetricKind::MarketCap);
        assert!(!mentions.is_empty());
        let mention = &mentions[0];
        assert_eq!(mention.raw_value, "1.5");
        assert_eq!(mention.scale, UnitScale::Billion);
        assert_eq!(mention.date.as_deref(), Some("2023-06-15"));
        assert_eq!(mention.amount(), Some(1_500_000_000.0));
        assert!(mention.context.contains("market cap"));
    }

    #[test]
    fn month_name_dates_normalize_to_iso() {
        let extractor = FinancialExtractor::new();
        let text = "On June 15, 2023 the startup raised $50 million in funding.";
        let set = extractor.extract_financial_metrics(text);

        let mention = set.latest(MetricKind::Funding).unwrap();
        assert_eq!(mention.date.as_deref(), Some("2023-06-15"));
        assert_eq!(mention.amount(), Some(50_000_000.0));
    }

    #[test]
    fn overlapping_patterns_yield_duplicate_mentions() {
        let extractor = FinancialExtractor::new();
        // Shape 1 ("$2 billion valuation") and shape 2 ("valuation of $2
        // billion") both fire; the raw-mentions contract keeps both.
        let text = "A $2 billion valuation was confirmed; the valuation of $2 billion held.";
        let set = extractor.extract_financial_metrics(text);
        assert!(set.mentions_of(MetricKind::Valuation).len() >= 2);
    }

    #[test]
    fn bare_amount_after_keyword_with_at() {
        let extractor = FinancialExtractor::new();
        let text = "Investors put the valuation at 3.2 billion after the round.";
        let set = extractor.extract_financial_metrics(text);
        let mention = set.latest(MetricKind::Valuation).unwrap();
        assert_eq!(mention.raw_value, "3.2");
        assert_eq!(mention.scale, UnitScale::Billion);
    }

    #[test]
    fn latest_prefers_dated_over_undated_mentions() {
        let mut set = FinancialMetricsSet::default();
        let undated = FinancialMention {
            kind: MetricKind::Revenue,
            raw_value: "9".to_string(),
            scale: UnitScale::Million,
            date: None,
            context: String::new(),
        };
        let dated = FinancialMention {
            date: Some("2021-01-01".to_string()),
            raw_value: "7".to_string(),
            ..undated.clone()
        };
        set.push(undated);
        set.push(dated);

        let latest = set.latest(MetricKind::Revenue).unwrap();
        assert_eq!(latest.raw_value, "7");
    }

    #[test]
    fn unparseable_amounts_are_skipped_not_fatal() {
        let mut set = FinancialMetricsSet::default();
        set.push(FinancialMention {
            kind: MetricKind::Revenue,
            raw_value: "1.2.3".to_string(),
            scale: UnitScale::Billion,
            date: Some("2024-05-01".to_string()),
            context: String::new(),
        });
        set.push(FinancialMention {
            kind: MetricKind::Revenue,
            raw_value: "4".to_string(),
            scale: UnitScale::Million,
            date: Some("2020-01-01".to_string()),
            context: String::new(),
        });

        // The garbage mention is newer but unusable; selection moves on.
        let latest = set.latest(MetricKind::Revenue).unwrap();
        assert_eq!(latest.amount(), Some(4_000_000.0));
    }

    #[test]
    fn growth_rate_from_grew_by() {
        let extractor = FinancialExtractor::new();
        assert_eq!(
            extractor.extract_growth_rate("Revenue grew by 42% year over year."),
            Some(0.42)
        );
        assert_eq!(extractor.extract_growth_rate("No numbers here."), None);
    }

    #[test]
    fn growth_rate_takes_first_pattern_match() {
        let extractor = FinancialExtractor::new();
        let text = "Sales increased by 10% after headcount grew by 80%.";
        // "grew by" precedes "increased by" in the pattern order.
        assert_eq!(extractor.extract_growth_rate(text), Some(0.80));
    }

    #[test]
    fn industry_from_surface_patterns() {
        let extractor = FinancialExtractor::new();
        assert_eq!(
            extractor.extract_industry("We are a SaaS company based in Berlin."),
            Some("saas".to_string())
        );
        assert_eq!(
            extractor.extract_industry("Industry: Enterprise Software. Founded 2019."),
            Some("enterprise software".to_string())
        );
        assert_eq!(extractor.extract_industry("Nothing to see."), None);
    }

    #[test]
    fn windows_clamp_to_char_boundaries() {
        let text = "répétition café 2023-01-02 $5 million in funding née";
        let extractor = FinancialExtractor::new();
        let set = extractor.extract_financial_metrics(text);
        let mention = set.latest(MetricKind::Funding).unwrap();
        assert_eq!(mention.date.as_deref(), Some("2023-01-02"));
    }
}
