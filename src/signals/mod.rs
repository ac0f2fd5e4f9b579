pub mod company;
pub mod contacts;
pub mod financial;

pub use company::{CompanyInfo, Competitor};
pub use contacts::{ContactExtractor, ContactSignals};
pub use financial::{
    FinancialExtractor, FinancialMention, FinancialMetricsSet, MetricKind, UnitScale,
};
