pub mod multiples;
pub mod reconciler;

pub use multiples::{format_currency, industry_multiple};
pub use reconciler::{
    Confidence, MethodKind, SupportingMetrics, ValuationEstimate, ValuationMethodResult,
    ValuationReconciler,
};
