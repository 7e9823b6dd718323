use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::path::Path;

use analysis_core::{AnalysisError, MetricSet, MetricsSource};

/// `MetricsSource` over metrics already loaded in memory.
///
/// Fetched metrics are stamped with the requested analysis date.
pub struct InMemoryMetrics {
    metrics: DashMap<String, MetricSet>,
}

impl InMemoryMetrics {
    pub fn new(metrics: Vec<MetricSet>) -> Self {
        let map = DashMap::new();
        for m in metrics {
            map.insert(m.ticker.clone(), m);
        }
        Self { metrics: map }
    }

    /// Loads a JSON array of `MetricSet`s.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::UniverseUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AnalysisError> {
        let metrics: Vec<MetricSet> = serde_json::from_str(raw)
            .map_err(|e| AnalysisError::UniverseUnavailable(format!("malformed metrics: {}", e)))?;
        Ok(Self::new(metrics))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[async_trait]
impl MetricsSource for InMemoryMetrics {
    async fn universe(&self) -> Result<Vec<String>, AnalysisError> {
        let mut tickers: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        tickers.sort();
        Ok(tickers)
    }

    async fn fetch(&self, ticker: &str, as_of: NaiveDate) -> Result<MetricSet, AnalysisError> {
        let entry = self
            .metrics
            .get(ticker)
            .ok_or_else(|| AnalysisError::SourceUnavailable(format!("no metrics for {}", ticker)))?;
        let mut metrics = entry.value().clone();
        metrics.analysis_date = as_of;
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[tokio::test]
    async fn test_json_round_trip_through_source() {
        let raw = r#"[
            {"ticker": "BBB", "analysis_date": "2026-01-01", "current_price": 10.0},
            {"ticker": "AAA", "analysis_date": "2026-01-01", "revenue_history": [1.0, 2.0]}
        ]"#;
        let source = InMemoryMetrics::from_json(raw).unwrap();
        assert_eq!(source.universe().await.unwrap(), vec!["AAA", "BBB"]);

        let m = source.fetch("BBB", date()).await.unwrap();
        assert_eq!(m.current_price, Some(10.0));
        assert_eq!(m.analysis_date, date());
        assert!(m.eps.is_none());
    }

    #[tokio::test]
    async fn test_unknown_ticker() {
        let source = InMemoryMetrics::new(vec![]);
        assert!(matches!(
            source.fetch("NOPE", date()).await,
            Err(AnalysisError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(
            InMemoryMetrics::from_json("{not json"),
            Err(AnalysisError::UniverseUnavailable(_))
        ));
        assert!(InMemoryMetrics::from_json_file("/nonexistent/metrics.json").is_err());
    }
}
