use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use analysis_core::{AnalysisError, EngineConfig, MetricsSource, StockAnalysisRecord, Verdict};
use verdict_engine::VerdictEngine;

use crate::filters::UniverseFilter;
use crate::magic_formula;
use crate::picks::{order_picks, RankedPick};

/// Output of a batch run: every analyzed ticker in pick order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedUniverse {
    pub analysis_date: NaiveDate,
    pub picks: Vec<RankedPick>,
    pub total_analyzed: usize,
    pub insufficient_data: usize,
}

impl RankedUniverse {
    /// Picks passing `filter`, keeping the universe-wide order and positions.
    pub fn filtered(&self, filter: &UniverseFilter) -> Vec<&RankedPick> {
        self.picks.iter().filter(|p| filter.matches(&p.record)).collect()
    }

    pub fn top(&self, n: usize) -> &[RankedPick] {
        &self.picks[..n.min(self.picks.len())]
    }

    pub fn buy_side(&self) -> impl Iterator<Item = &RankedPick> {
        self.picks.iter().filter(|p| p.record.verdict.is_buy_side())
    }
}

/// Two-phase batch: per-ticker analysis fanned out over a bounded task pool,
/// then cross-sectional ranking once every record is in.
pub struct UniverseRanker {
    engine: Arc<VerdictEngine>,
    concurrency: usize,
}

impl UniverseRanker {
    pub fn new(engine: VerdictEngine, concurrency: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, AnalysisError> {
        Ok(Self::new(VerdictEngine::from_config(config)?, config.concurrency))
    }

    /// Phase 1. A ticker whose fetch fails gets an INSUFFICIENT_DATA record;
    /// the run itself fails only when the universe cannot be listed or no
    /// fetch succeeds at all.
    pub async fn analyze_universe<S>(
        &self,
        source: Arc<S>,
        as_of: NaiveDate,
    ) -> Result<Vec<StockAnalysisRecord>, AnalysisError>
    where
        S: MetricsSource + ?Sized + 'static,
    {
        let mut tickers = source
            .universe()
            .await
            .map_err(|e| AnalysisError::UniverseUnavailable(e.to_string()))?;
        tickers.sort();
        tickers.dedup();

        tracing::info!("Analyzing universe of {} tickers as of {}", tickers.len(), as_of);

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for ticker in tickers.iter().cloned() {
            let source = Arc::clone(&source);
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire().await.ok();
                let result = source.fetch(&ticker, as_of).await.map(|m| engine.analyze(&m));
                (ticker, result)
            });
        }

        let mut records: HashMap<String, StockAnalysisRecord> = HashMap::with_capacity(tickers.len());
        let mut fetch_failures = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((ticker, Ok(record))) => {
                    records.insert(ticker, record);
                }
                Ok((ticker, Err(e))) => {
                    tracing::warn!("Failed to analyze {}: {}", ticker, e);
                    fetch_failures += 1;
                    let record = StockAnalysisRecord::insufficient_data(&ticker, as_of, format!("Insufficient data: {}", e));
                    records.insert(ticker, record);
                }
                Err(e) => {
                    tracing::error!("Analysis task error: {}", e);
                }
            }
        }

        for ticker in &tickers {
            if !records.contains_key(ticker) {
                fetch_failures += 1;
                records.insert(
                    ticker.clone(),
                    StockAnalysisRecord::insufficient_data(ticker, as_of, "Insufficient data: analysis task failed"),
                );
            }
        }

        if !tickers.is_empty() && fetch_failures == tickers.len() {
            return Err(AnalysisError::UniverseUnavailable(format!(
                "all {} metric fetches failed",
                tickers.len()
            )));
        }

        Ok(records.into_values().collect())
    }

    /// Phase 2. Pure over the collected records.
    pub fn rank(&self, records: Vec<StockAnalysisRecord>, as_of: NaiveDate) -> RankedUniverse {
        rank_universe(records, as_of)
    }

    pub async fn run<S>(&self, source: Arc<S>, as_of: NaiveDate) -> Result<RankedUniverse, AnalysisError>
    where
        S: MetricsSource + ?Sized + 'static,
    {
        let records = self.analyze_universe(source, as_of).await?;
        let ranked = rank_universe(records, as_of);
        tracing::info!(
            "Ranked {} tickers ({} insufficient data, {} buy-side)",
            ranked.total_analyzed,
            ranked.insufficient_data,
            ranked.buy_side().count()
        );
        Ok(ranked)
    }
}

pub fn rank_universe(records: Vec<StockAnalysisRecord>, as_of: NaiveDate) -> RankedUniverse {
    let ranks = magic_formula::rank(&records);
    let total_analyzed = records.len();
    let insufficient_data = records
        .iter()
        .filter(|r| r.verdict == Verdict::InsufficientData)
        .count();

    RankedUniverse {
        analysis_date: as_of,
        picks: order_picks(records, &ranks),
        total_analyzed,
        insufficient_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryMetrics;
    use analysis_core::MetricSet;
    use async_trait::async_trait;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn create_test_metrics(ticker: &str, price: f64) -> MetricSet {
        let mut m = MetricSet::new(ticker, date());
        m.current_price = Some(price);
        m.market_cap = Some(price * 100.0);
        m.shares_outstanding = Some(100.0);
        m.eps = Some(4.0);
        m.book_value_per_share = Some(20.0);
        m.revenue = Some(3_000_000_000.0);
        m.net_income = Some(400.0);
        m.stockholders_equity = Some(2000.0);
        m.ebit = Some(550.0);
        m.interest_expense = Some(25.0);
        m.total_debt = Some(400.0);
        m.cash = Some(300.0);
        m.current_assets = Some(900.0);
        m.current_liabilities = Some(400.0);
        m.net_ppe = Some(1000.0);
        m.depreciation_amortization = Some(100.0);
        m.free_cash_flow = Some(450.0);
        m.earnings_growth_rate = Some(0.12);
        m.capex_history = vec![90.0, 110.0];
        m.revenue_history = vec![1000.0, 1120.0, 1250.0, 1400.0];
        m.margin_history = vec![0.14, 0.15, 0.16, 0.17];
        m.net_income_history = vec![300.0, 330.0, 360.0, 380.0, 400.0];
        m.eps_history = vec![3.0, 3.3, 3.6, 3.8, 4.0];
        m.country = Some("US".to_string());
        m
    }

    /// Lists tickers it cannot fetch.
    struct BrokenSource {
        tickers: Vec<String>,
        list_fails: bool,
    }

    #[async_trait]
    impl MetricsSource for BrokenSource {
        async fn universe(&self) -> Result<Vec<String>, AnalysisError> {
            if self.list_fails {
                return Err(AnalysisError::SourceUnavailable("listing down".to_string()));
            }
            Ok(self.tickers.clone())
        }

        async fn fetch(&self, ticker: &str, _as_of: NaiveDate) -> Result<MetricSet, AnalysisError> {
            Err(AnalysisError::SourceUnavailable(format!("{} timed out", ticker)))
        }
    }

    #[tokio::test]
    async fn test_run_orders_and_ranks() {
        let source = Arc::new(InMemoryMetrics::new(vec![
            create_test_metrics("DEAR", 400.0),
            create_test_metrics("CHEAP", 15.0),
            create_test_metrics("MID", 60.0),
            MetricSet::new("EMPTY", date()),
        ]));
        let ranker = UniverseRanker::from_config(&EngineConfig::default()).unwrap();
        let ranked = ranker.run(source, date()).await.unwrap();

        assert_eq!(ranked.total_analyzed, 4);
        assert_eq!(ranked.insufficient_data, 1);
        assert_eq!(ranked.picks.len(), 4);
        assert_eq!(ranked.picks[0].record.ticker, "CHEAP");
        assert_eq!(ranked.picks[3].record.ticker, "EMPTY");
        assert!(ranked.picks.iter().enumerate().all(|(i, p)| p.position == i + 1));
        for pair in ranked.picks.windows(2) {
            assert!(pair[0].record.verdict.priority() <= pair[1].record.verdict.priority());
        }
        assert!(ranked.picks[3].magic_formula.is_none());
        assert!(ranked.picks[0].magic_formula.is_some());
    }

    #[tokio::test]
    async fn test_one_failed_fetch_does_not_abort() {
        struct PartialSource(InMemoryMetrics);

        #[async_trait]
        impl MetricsSource for PartialSource {
            async fn universe(&self) -> Result<Vec<String>, AnalysisError> {
                let mut tickers = self.0.universe().await?;
                tickers.push("GHOST".to_string());
                Ok(tickers)
            }

            async fn fetch(&self, ticker: &str, as_of: NaiveDate) -> Result<MetricSet, AnalysisError> {
                self.0.fetch(ticker, as_of).await
            }
        }

        let source = Arc::new(PartialSource(InMemoryMetrics::new(vec![create_test_metrics("REAL", 30.0)])));
        let records = UniverseRanker::new(VerdictEngine::default(), 2)
            .analyze_universe(source, date())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        let ghost = records.iter().find(|r| r.ticker == "GHOST").unwrap();
        assert_eq!(ghost.verdict, Verdict::InsufficientData);
        assert_eq!(ghost.analysis_date, date());
        let real = records.iter().find(|r| r.ticker == "REAL").unwrap();
        assert_ne!(real.verdict, Verdict::InsufficientData);
    }

    #[tokio::test]
    async fn test_all_fetches_failing_is_fatal() {
        let source = Arc::new(BrokenSource {
            tickers: vec!["A".to_string(), "B".to_string()],
            list_fails: false,
        });
        let result = UniverseRanker::new(VerdictEngine::default(), 4).run(source, date()).await;
        assert!(matches!(result, Err(AnalysisError::UniverseUnavailable(_))));
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let source = Arc::new(BrokenSource {
            tickers: vec![],
            list_fails: true,
        });
        let result = UniverseRanker::new(VerdictEngine::default(), 4).run(source, date()).await;
        assert!(matches!(result, Err(AnalysisError::UniverseUnavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_universe() {
        let source = Arc::new(InMemoryMetrics::new(vec![]));
        let ranked = UniverseRanker::new(VerdictEngine::default(), 4).run(source, date()).await.unwrap();
        assert!(ranked.picks.is_empty());
        assert_eq!(ranked.total_analyzed, 0);
    }

    #[tokio::test]
    async fn test_filter_keeps_positions() {
        let mut other = create_test_metrics("CA1", 15.0);
        other.country = Some("CA".to_string());
        let source = Arc::new(InMemoryMetrics::new(vec![
            other,
            create_test_metrics("US1", 20.0),
            create_test_metrics("US2", 300.0),
        ]));
        let ranked = UniverseRanker::new(VerdictEngine::default(), 1).run(source, date()).await.unwrap();

        let filter = UniverseFilter {
            countries: vec!["us".to_string()],
            ..UniverseFilter::default()
        };
        let us = ranked.filtered(&filter);
        assert_eq!(us.len(), 2);
        assert!(us.iter().all(|p| p.record.country.as_deref() == Some("US")));
        assert!(us[0].position < us[1].position);
        assert_eq!(ranked.top(10).len(), 3);
    }
}
