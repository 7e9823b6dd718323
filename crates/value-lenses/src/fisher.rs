use analysis_core::{stats, AnalysisError, Lens, LensResult, LensScorer, MetricSet};
use serde::{Deserialize, Serialize};

use crate::pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTrend {
    Improving,
    Stable,
    Declining,
}

/// Normalized slope beyond which margins count as moving.
const TREND_THRESHOLD: f64 = 0.05;

/// Direction of the margin series and a trend score in [-1, 1].
pub fn margin_trend(margins: &[f64]) -> (MarginTrend, f64) {
    if margins.len() < 2 {
        return (MarginTrend::Stable, 0.0);
    }
    let avg = stats::mean(margins);
    if avg.abs() < f64::EPSILON {
        return (MarginTrend::Stable, 0.0);
    }

    let normalized = stats::linear_slope(margins) / avg.abs();
    if normalized > TREND_THRESHOLD {
        (MarginTrend::Improving, (normalized * 5.0).min(1.0))
    } else if normalized < -TREND_THRESHOLD {
        (MarginTrend::Declining, (normalized * 5.0).max(-1.0))
    } else {
        (MarginTrend::Stable, 0.0)
    }
}

/// 1 - CV of year-over-year growth, floored at 0. Neutral with fewer than two periods.
pub fn growth_consistency(series: &[f64]) -> f64 {
    let growth = stats::year_over_year(series);
    if growth.len() < 2 {
        return 0.5;
    }
    let avg = stats::mean(&growth);
    if avg.abs() < f64::EPSILON {
        return 0.0;
    }
    (1.0 - stats::std_dev(&growth) / avg.abs()).max(0.0)
}

/// Long-term growth quality.
pub struct FisherLens;

impl LensScorer for FisherLens {
    fn lens(&self) -> Lens {
        Lens::Fisher
    }

    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError> {
        let revenue = &metrics.revenue_history;
        if revenue.len() < 2 {
            return Err(AnalysisError::MissingData(
                "need at least two years of revenue".to_string(),
            ));
        }

        let years = (revenue.len() - 1) as f64;
        let sales_cagr = stats::cagr(revenue[0], revenue[revenue.len() - 1], years);
        let (trend, trend_score) = margin_trend(&metrics.margin_history);
        let consistency = growth_consistency(revenue);

        // Each component on 0-100
        let sales_component = (sales_cagr / 0.20).clamp(0.0, 1.0) * 100.0;
        let margin_component = (trend_score + 1.0) / 2.0 * 100.0;
        let consistency_component = consistency * 100.0;
        let roe_component = metrics.roe().map(|roe| (roe / 0.20).clamp(0.0, 1.0) * 100.0);

        // Without ROE the bonus is dropped and the other weights renormalized
        let growth_points = 0.40 * sales_component + 0.30 * margin_component + 0.20 * consistency_component;
        let score = match roe_component {
            Some(roe) => growth_points + 0.10 * roe,
            None => growth_points / 0.90,
        };

        let verdict = if sales_cagr >= 0.15 && trend == MarginTrend::Improving {
            "Outstanding Grower"
        } else if sales_cagr >= 0.10 && trend == MarginTrend::Declining {
            "Grower, Margins Slipping"
        } else if sales_cagr >= 0.10 {
            "Strong Grower"
        } else if sales_cagr >= 0.05 {
            "Moderate Grower"
        } else if sales_cagr > 0.0 {
            "Slow Grower"
        } else {
            "Shrinking"
        };

        let insight = format!(
            "Sales compounding at {} with {:?} margins; growth consistency {:.0}%",
            pct(sales_cagr),
            trend,
            consistency * 100.0
        );

        Ok(LensResult::new(
            Lens::Fisher,
            score,
            format!("Sales CAGR: {}", pct(sales_cagr)),
            verdict,
            insight,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn create_test_metrics(revenue: Vec<f64>, margins: Vec<f64>) -> MetricSet {
        let mut m = MetricSet::new("FSHR", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        m.revenue_history = revenue;
        m.margin_history = margins;
        m
    }

    #[test]
    fn test_margin_trend() {
        assert_eq!(margin_trend(&[0.10, 0.12, 0.14, 0.16]).0, MarginTrend::Improving);
        assert_eq!(margin_trend(&[0.16, 0.14, 0.12, 0.10]).0, MarginTrend::Declining);
        assert_eq!(margin_trend(&[0.10, 0.101, 0.10]).0, MarginTrend::Stable);
        assert_eq!(margin_trend(&[]), (MarginTrend::Stable, 0.0));

        let (_, score) = margin_trend(&[0.05, 0.10, 0.20]);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_steady_compounder_scores_high() {
        // 20% a year with perfectly consistent growth and improving margins
        let m = create_test_metrics(
            vec![100.0, 120.0, 144.0, 172.8],
            vec![0.10, 0.12, 0.14, 0.16],
        );
        let result = FisherLens.score(&m).unwrap();
        assert!(result.score >= 80.0);
        assert_eq!(result.verdict, "Outstanding Grower");
        assert_relative_eq!(growth_consistency(&m.revenue_history), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shrinking_company() {
        let m = create_test_metrics(vec![200.0, 180.0, 150.0], vec![0.10, 0.08, 0.05]);
        let result = FisherLens.score(&m).unwrap();
        assert_eq!(result.verdict, "Shrinking");
        assert!(result.score < 30.0);
    }

    #[test]
    fn test_missing_roe_is_renormalized() {
        // Flat revenue and margins: sales 0, margin 50, consistency 0
        let mut m = create_test_metrics(vec![100.0, 100.0, 100.0], vec![0.10, 0.10, 0.10]);
        let without_roe = FisherLens.score(&m).unwrap();
        assert_relative_eq!(without_roe.score, 15.0 / 0.90, epsilon = 1e-9);

        m.net_income = Some(40.0);
        m.stockholders_equity = Some(200.0);
        let with_roe = FisherLens.score(&m).unwrap();
        assert_relative_eq!(with_roe.score, 15.0 + 10.0, epsilon = 1e-9);

        m.net_income = Some(0.0);
        let zero_roe = FisherLens.score(&m).unwrap();
        assert!(zero_roe.score < without_roe.score);
    }

    #[test]
    fn test_short_history_skips_lens() {
        let m = create_test_metrics(vec![100.0], vec![]);
        assert!(matches!(FisherLens.score(&m), Err(AnalysisError::MissingData(_))));
    }
}
