use analysis_core::{AnalysisError, Lens, LensResult, LensScorer, MetricSet};
use serde::{Deserialize, Serialize};

/// Graham's seven defensive-investor criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrahamCriteria {
    pub adequate_size: bool,
    pub strong_financial_condition: bool,
    pub earnings_stability: bool,
    pub dividend_record: bool,
    pub earnings_growth: bool,
    pub moderate_pe: bool,
    pub moderate_price_to_assets: bool,
}

impl GrahamCriteria {
    pub fn passed(&self) -> u8 {
        [
            self.adequate_size,
            self.strong_financial_condition,
            self.earnings_stability,
            self.dividend_record,
            self.earnings_growth,
            self.moderate_pe,
            self.moderate_price_to_assets,
        ]
        .iter()
        .filter(|c| **c)
        .count() as u8
    }
}

pub struct GrahamLens {
    min_revenue: f64,
}

impl GrahamLens {
    pub fn new(min_revenue: f64) -> Self {
        Self { min_revenue }
    }

    /// √(22.5 × EPS × BVPS); undefined for non-positive EPS or book value.
    pub fn graham_number(metrics: &MetricSet) -> Option<f64> {
        match (metrics.eps, metrics.book_value()) {
            (Some(eps), Some(bvps)) if eps > 0.0 && bvps > 0.0 => Some((22.5 * eps * bvps).sqrt()),
            _ => None,
        }
    }

    /// Missing data fails the affected criterion.
    pub fn criteria(&self, metrics: &MetricSet) -> GrahamCriteria {
        let pe = metrics.pe_ratio();
        let pb = metrics.pb_ratio();

        GrahamCriteria {
            adequate_size: metrics.revenue.map_or(false, |r| r >= self.min_revenue),
            strong_financial_condition: metrics.current_ratio().map_or(false, |cr| cr >= 2.0),
            earnings_stability: last_n_positive(&metrics.net_income_history, 5),
            dividend_record: last_n_positive(&metrics.dividend_history, 5),
            earnings_growth: eps_growth(&metrics.eps_history).map_or(false, |g| g >= 0.33),
            moderate_pe: pe.map_or(false, |pe| pe <= 15.0),
            moderate_price_to_assets: pb.map_or(false, |pb| pb <= 1.5)
                || matches!((pe, pb), (Some(pe), Some(pb)) if pe * pb <= 22.5),
        }
    }
}

fn last_n_positive(series: &[f64], n: usize) -> bool {
    series.len() >= n && series[series.len() - n..].iter().all(|v| *v > 0.0)
}

/// Growth from the earliest to the latest EPS in the series.
fn eps_growth(eps_history: &[f64]) -> Option<f64> {
    let first = *eps_history.first()?;
    let last = *eps_history.last()?;
    if eps_history.len() < 2 || first <= 0.0 {
        return None;
    }
    Some((last - first) / first)
}

impl LensScorer for GrahamLens {
    fn lens(&self) -> Lens {
        Lens::Graham
    }

    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError> {
        let price = metrics
            .price()
            .ok_or_else(|| AnalysisError::MissingData("current_price".to_string()))?;

        let criteria = self.criteria(metrics);
        let passed = criteria.passed();
        let score = passed as f64 / 7.0 * 100.0;

        let graham_number = Self::graham_number(metrics);
        let price_to_graham = graham_number.map(|gn| price / gn);

        let verdict = match price_to_graham {
            Some(ratio) if passed >= 5 && ratio <= 0.7 => "Strong Buy",
            Some(ratio) if passed >= 4 && ratio <= 0.85 => "Buy",
            Some(ratio) if passed >= 3 && ratio <= 1.0 => "Hold",
            None if passed >= 5 => "Buy",
            None if passed >= 3 => "Hold",
            _ => "Avoid",
        };

        let key_metric = match graham_number {
            Some(gn) => format!("Graham #: ${:.2}", gn),
            None => format!("{}/7 criteria", passed),
        };

        let insight = match price_to_graham {
            Some(ratio) => format!(
                "Passes {}/7 defensive criteria; price is {:.0}% of the Graham Number",
                passed,
                ratio * 100.0
            ),
            None => format!(
                "Passes {}/7 defensive criteria; Graham Number undefined for negative earnings or book value",
                passed
            ),
        };

        Ok(LensResult::new(Lens::Graham, score, key_metric, verdict, insight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn create_test_metrics() -> MetricSet {
        let mut m = MetricSet::new("GRHM", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        m.current_price = Some(30.0);
        m.eps = Some(5.0);
        m.book_value_per_share = Some(20.0);
        m.revenue = Some(3_000_000_000.0);
        m.current_assets = Some(500.0);
        m.current_liabilities = Some(200.0);
        m.net_income_history = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        m.dividend_history = vec![1.0, 1.0, 1.1, 1.1, 1.2];
        m.eps_history = vec![3.0, 3.5, 4.0, 4.5, 5.0];
        m
    }

    #[test]
    fn test_graham_number() {
        let m = create_test_metrics();
        let gn = GrahamLens::graham_number(&m).unwrap();
        assert_relative_eq!(gn, 2250.0_f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(gn, 47.43, epsilon = 0.01);

        let mut m = create_test_metrics();
        m.eps = Some(5.0);
        m.book_value_per_share = Some(25.0);
        assert_relative_eq!(GrahamLens::graham_number(&m).unwrap(), 53.03, epsilon = 0.01);
    }

    #[test]
    fn test_all_criteria_pass() {
        let lens = GrahamLens::new(2_000_000_000.0);
        let m = create_test_metrics();
        // P/E = 6, P/B = 1.5, product 9
        assert_eq!(lens.criteria(&m).passed(), 7);

        let result = lens.score(&m).unwrap();
        assert_relative_eq!(result.score, 100.0);
        assert_eq!(result.verdict, "Strong Buy");
    }

    #[test]
    fn test_negative_eps_disables_graham_number_only() {
        let lens = GrahamLens::new(2_000_000_000.0);
        let mut m = create_test_metrics();
        m.eps = Some(-2.0);
        assert!(GrahamLens::graham_number(&m).is_none());

        let result = lens.score(&m).unwrap();
        // Only the P/E criterion fails; P/B of 1.5 still passes price-to-assets
        assert_relative_eq!(result.score, 6.0 / 7.0 * 100.0, epsilon = 1e-9);
        assert_eq!(result.key_metric, "6/7 criteria");
    }

    #[test]
    fn test_price_to_assets_passes_on_book_alone() {
        let lens = GrahamLens::new(2_000_000_000.0);
        let mut m = create_test_metrics();
        m.eps = Some(-1.0);
        m.current_price = Some(25.0);
        let criteria = lens.criteria(&m);
        assert!(!criteria.moderate_pe);
        assert!(criteria.moderate_price_to_assets);

        // P/B 2.0 without a P/E fails both branches
        m.current_price = Some(40.0);
        assert!(!lens.criteria(&m).moderate_price_to_assets);

        // P/E 8, P/B 2.0: product 16 passes
        m.eps = Some(5.0);
        assert!(lens.criteria(&m).moderate_price_to_assets);
    }

    #[test]
    fn test_short_history_fails_stability() {
        let lens = GrahamLens::new(2_000_000_000.0);
        let mut m = create_test_metrics();
        m.net_income_history = vec![10.0, 11.0];
        m.dividend_history = vec![1.0, 1.0, 1.0, 1.0, 0.0];
        let criteria = lens.criteria(&m);
        assert!(!criteria.earnings_stability);
        assert!(!criteria.dividend_record);
    }

    #[test]
    fn test_missing_price_skips_lens() {
        let lens = GrahamLens::new(2_000_000_000.0);
        let mut m = create_test_metrics();
        m.current_price = None;
        assert!(matches!(lens.score(&m), Err(AnalysisError::MissingData(_))));
    }
}
