//! Range-based intrinsic valuation.
//!
//! Each method produces a conservative/base/optimistic triple per share; the
//! composite blends the usable ones, and the margin-of-safety gate compares the
//! composite's conservative end with the current price.

pub mod composite;
pub mod confidence;
pub mod margin;
pub mod methods;

pub use composite::composite_range;
pub use margin::{evaluate as evaluate_margin, mos_ratio};

use analysis_core::{CompositeValuationRange, EngineConfig, MethodScore, MetricSet, ValuationMethod, ValuationRange};

/// Market assumptions shared by the valuation methods.
#[derive(Debug, Clone, Copy)]
pub struct ValuationAssumptions {
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub dcf_years: u32,
    pub risk_free_rate: f64,
    pub required_return: f64,
    pub default_industry_pe: f64,
}

impl From<&EngineConfig> for ValuationAssumptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            discount_rate: config.discount_rate,
            terminal_growth: config.terminal_growth,
            dcf_years: config.dcf_years,
            risk_free_rate: config.risk_free_rate,
            required_return: config.required_return,
            default_industry_pe: config.default_industry_pe,
        }
    }
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

pub struct ValuationBuilder {
    assumptions: ValuationAssumptions,
}

impl Default for ValuationBuilder {
    fn default() -> Self {
        Self::new(ValuationAssumptions::default())
    }
}

impl ValuationBuilder {
    pub fn new(assumptions: ValuationAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(ValuationAssumptions::from(config))
    }

    /// Every method that can be computed from `metrics`.
    pub fn method_ranges(&self, metrics: &MetricSet, quality: f64) -> Vec<ValuationRange> {
        let a = &self.assumptions;
        let candidates = [
            ("DCF", methods::dcf_range(metrics, a)),
            ("earnings", methods::earnings_range(metrics, quality, a)),
            ("book value", methods::book_value_range(metrics, quality)),
            ("owner earnings", methods::owner_earnings_range(metrics, a)),
            ("PAD", methods::pad_range(metrics, quality, a)),
        ];

        candidates
            .into_iter()
            .filter_map(|(name, range)| {
                if range.is_none() {
                    tracing::debug!("{} valuation skipped for {}: inputs unavailable", name, metrics.ticker);
                }
                range
            })
            .collect()
    }

    pub fn build(&self, metrics: &MetricSet, quality: f64) -> Option<CompositeValuationRange> {
        composite_range(&self.method_ranges(metrics, quality), quality)
    }
}

/// Per-method margin of safety and MOSEE (earnings on equity / margin of safety).
///
/// Every range is scored on its base value. The trailing average market price,
/// when known, is scored as a `Market` entry after the ranges.
pub fn method_scores(metrics: &MetricSet, ranges: &[ValuationRange]) -> Vec<MethodScore> {
    let price = metrics.price();
    let earnings_equity = metrics.earnings_on_equity();

    let score = |method: ValuationMethod, value: f64| {
        let mos = match price {
            Some(price) if value.abs() > f64::EPSILON => Some(price / value),
            _ => None,
        };
        let mosee = match (mos, earnings_equity) {
            (Some(mos), Some(ee)) if mos < 0.0 && ee < 0.0 => Some(0.0),
            (Some(mos), Some(ee)) if mos.abs() > f64::EPSILON => Some(ee / mos),
            _ => None,
        };
        MethodScore { method, value, mos, mosee }
    };

    let market = metrics
        .average_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|avg| score(ValuationMethod::Market, avg));

    ranges
        .iter()
        .map(|range| score(range.method, range.base))
        .chain(market)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::ValueConfidence;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn create_test_metrics() -> MetricSet {
        let mut m = MetricSet::new("FULL", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        m.current_price = Some(50.0);
        m.market_cap = Some(5000.0);
        m.shares_outstanding = Some(100.0);
        m.free_cash_flow = Some(500.0);
        m.earnings_growth_rate = Some(0.08);
        m.eps = Some(4.0);
        m.book_value_per_share = Some(20.0);
        m.net_income = Some(400.0);
        m.stockholders_equity = Some(2000.0);
        m.depreciation_amortization = Some(100.0);
        m.capex_history = vec![100.0, 100.0];
        m.net_income_history = vec![300.0, 330.0, 360.0, 380.0, 400.0];
        m
    }

    #[test]
    fn test_all_methods_built() {
        let ranges = ValuationBuilder::default().method_ranges(&create_test_metrics(), 70.0);
        assert_eq!(ranges.len(), 5);
        for range in &ranges {
            assert!(range.conservative <= range.base && range.base <= range.optimistic);
        }
    }

    #[test]
    fn test_missing_inputs_drop_methods() {
        let mut m = create_test_metrics();
        m.free_cash_flow = None;
        m.net_income_history.clear();
        let ranges = ValuationBuilder::default().method_ranges(&m, 70.0);
        assert_eq!(ranges.len(), 3);
        assert!(ranges.iter().all(|r| r.method != ValuationMethod::Dcf && r.method != ValuationMethod::Pad));
    }

    #[test]
    fn test_build_composite() {
        let composite = ValuationBuilder::default().build(&create_test_metrics(), 70.0).unwrap();
        assert!(composite.conservative <= composite.base);
        assert!(composite.base <= composite.optimistic);
        assert_eq!(composite.methods.len(), 5);
    }

    #[test]
    fn test_method_scores() {
        let m = create_test_metrics();
        let range = ValuationRange::new(ValuationMethod::Pad, 80.0, 100.0, 120.0, ValueConfidence::Medium);
        let scores = method_scores(&m, &[range]);
        // mos 0.5, earnings on equity 0.08
        assert_relative_eq!(scores[0].mos.unwrap(), 0.5);
        assert_relative_eq!(scores[0].mosee.unwrap(), 0.16, epsilon = 1e-9);
    }

    #[test]
    fn test_market_average_price_scored() {
        let mut m = create_test_metrics();
        m.average_price = Some(40.0);
        let range = ValuationRange::new(ValuationMethod::Pad, 80.0, 100.0, 120.0, ValueConfidence::Medium);
        let scores = method_scores(&m, &[range]);

        assert_eq!(scores.len(), 2);
        let market = &scores[1];
        assert_eq!(market.method, ValuationMethod::Market);
        assert_relative_eq!(market.value, 40.0);
        // price 50 / average 40
        assert_relative_eq!(market.mos.unwrap(), 1.25);
        assert_relative_eq!(market.mosee.unwrap(), 0.08 / 1.25, epsilon = 1e-9);

        m.average_price = Some(0.0);
        assert_eq!(method_scores(&m, &[]).len(), 0);
    }

    #[test]
    fn test_method_scores_without_price() {
        let mut m = create_test_metrics();
        m.current_price = None;
        let range = ValuationRange::new(ValuationMethod::Dcf, 80.0, 100.0, 120.0, ValueConfidence::Medium);
        let scores = method_scores(&m, &[range]);
        assert!(scores[0].mos.is_none());
        assert!(scores[0].mosee.is_none());
    }
}
