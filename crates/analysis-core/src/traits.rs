use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{AnalysisError, Lens, LensResult, MetricSet};

/// One investing philosophy applied to a single company's metrics.
///
/// Scoring is pure: the same `MetricSet` always yields the same result.
/// A lens whose required inputs are absent returns `AnalysisError::MissingData`
/// and is left out of the composite rather than scored as zero.
pub trait LensScorer: Send + Sync {
    fn lens(&self) -> Lens;
    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError>;
}

/// Boundary to the collaborator that fetches and normalizes raw fundamentals.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Tickers that make up the candidate universe for a run.
    async fn universe(&self) -> Result<Vec<String>, AnalysisError>;

    async fn fetch(&self, ticker: &str, as_of: NaiveDate) -> Result<MetricSet, AnalysisError>;
}
