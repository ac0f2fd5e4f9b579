use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReconciliationError;
use crate::signals::company::CompanyInfo;
use crate::signals::financial::{FinancialMetricsSet, MetricKind};
use crate::valuation::multiples::{format_currency, industry_multiple};

const FUNDING_WEIGHT: f64 = 0.5;
const REVENUE_WEIGHT: f64 = 0.3;
const COMPARABLE_WEIGHT: f64 = 0.2;

/// Coarse quality signal. Ordering is Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    FundingBased,
    RevenueBased,
    ComparableBased,
}

/// One methodology's independent estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationMethodResult {
    pub method: MethodKind,
    /// Raw dollars.
    pub value: f64,
    pub confidence: Confidence,
    pub explanation: String,
    /// Fixed blend weight in [0, 1].
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportingMetrics {
    pub revenue: Option<f64>,
    pub growth_rate: Option<f64>,
    pub industry_multiple: Option<f64>,
    pub industry: Option<String>,
}

/// Terminal artifact of the evidence pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub blended_value: f64,
    pub blended_display: String,
    pub methodology: Vec<ValuationMethodResult>,
    pub confidence: Confidence,
    pub supporting_metrics: SupportingMetrics,
}

/// Combines extracted financial signals and industry metadata into one
/// weighted estimate across three methodologies.
pub struct ValuationReconciler;

impl ValuationReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Computes every methodology with usable inputs and blends them with
    /// fixed weights normalized over the present set. Zero usable
    /// methodologies is an expected outcome, reported as
    /// [`ReconciliationError::InsufficientData`].
    pub fn reconcile(
        &self,
        metrics: &FinancialMetricsSet,
        info: &CompanyInfo,
    ) -> Result<ValuationEstimate, ReconciliationError> {
        let today = Utc::now().date_naive();

        let mut methodology = Vec::new();
        if let Some(m) = self.funding_based(metrics) {
            methodology.push(m);
        }
        if let Some(m) = self.revenue_based(metrics, info) {
            methodology.push(m);
        }
        if let Some(m) = self.comparable_based(info, today) {
            methodology.push(m);
        }

        if methodology.is_empty() {
            return Err(ReconciliationError::InsufficientData);
        }

        let weight_sum: f64 = methodology.iter().map(|m| m.weight).sum();
        let blended_value = methodology
            .iter()
            .map(|m| m.weight * m.value)
            .sum::<f64>()
            / weight_sum;

        // Overall confidence mirrors the strongest contributing method.
        let confidence = methodology
            .iter()
            .map(|m| m.confidence)
            .max()
            .unwrap_or(Confidence::Low);

        let revenue = metrics
            .latest(MetricKind::Revenue)
            .and_then(|m| m.amount());
        let multiple = info
            .industry
            .as_deref()
            .map(|i| industry_multiple(i, info.growth_rate));

        debug!(
            "Reconciled {} methodologies into {}",
            methodology.len(),
            format_currency(blended_value)
        );

        Ok(ValuationEstimate {
            blended_value,
            blended_display: format_currency(blended_value),
            methodology,
            confidence,
            supporting_metrics: SupportingMetrics {
                revenue,
                growth_rate: info.growth_rate,
                industry_multiple: multiple,
                industry: info.industry.clone(),
            },
        })
    }

    /// Latest-dated valuation mention, passed through at High confidence.
    fn funding_based(&self, metrics: &FinancialMetricsSet) -> Option<ValuationMethodResult> {
        let mention = metrics.latest(MetricKind::Valuation)?;
        let value = mention.amount()?;
        let dated = mention.date.as_deref().unwrap_or("undated");

        Some(ValuationMethodResult {
            method: MethodKind::FundingBased,
            value,
            confidence: Confidence::High,
            explanation: format!(
                "Latest reported valuation {} ({})",
                format_currency(value),
                dated
            ),
            weight: FUNDING_WEIGHT,
        })
    }

    /// Latest-dated revenue mention times the growth-adjusted industry
    /// multiple.
    fn revenue_based(
        &self,
        metrics: &FinancialMetricsSet,
        info: &CompanyInfo,
    ) -> Option<ValuationMethodResult> {
        let mention = metrics.latest(MetricKind::Revenue)?;
        let revenue = mention.amount()?;
        let industry = info.industry.as_deref().unwrap_or("unknown");
        let multiple = industry_multiple(industry, info.growth_rate);
        let value = revenue * multiple;

        Some(ValuationMethodResult {
            method: MethodKind::RevenueBased,
            value,
            confidence: Confidence::Medium,
            explanation: format!(
                "{} revenue × {:.1} multiple ({})",
                format_currency(revenue),
                multiple,
                industry
            ),
            weight: REVENUE_WEIGHT,
        })
    }

    /// Recency- and size-weighted average of competitor valuations.
    fn comparable_based(
        &self,
        info: &CompanyInfo,
        today: NaiveDate,
    ) -> Option<ValuationMethodResult> {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut used = 0usize;

        for competitor in &info.competitors {
            let Some(valuation) = competitor.valuation else {
                continue;
            };
            let weight = recency_weight(competitor.valuation_date.as_deref(), today)
                * size_weight(competitor.size_ratio);
            weighted_sum += weight * valuation;
            weight_total += weight;
            used += 1;
        }

        if weight_total == 0.0 {
            return None;
        }
        let value = weighted_sum / weight_total;

        Some(ValuationMethodResult {
            method: MethodKind::ComparableBased,
            value,
            confidence: Confidence::Medium,
            explanation: format!(
                "Weighted average of {} comparable valuations ({})",
                used,
                format_currency(value)
            ),
            weight: COMPARABLE_WEIGHT,
        })
    }
}

impl Default for ValuationReconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// `1 / (1 + days_since/365)`; 1.0 when the date is missing or does not
/// parse. Future-dated observations clamp to zero days.
fn recency_weight(date: Option<&str>, today: NaiveDate) -> f64 {
    let Some(date) = date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) else {
        return 1.0;
    };
    let days = (today - date).num_days().max(0) as f64;
    1.0 / (1.0 + days / 365.0)
}

/// `1 / (1 + |1 − size_ratio|)`.
fn size_weight(size_ratio: f64) -> f64 {
    1.0 / (1.0 + (1.0 - size_ratio).abs())
}
