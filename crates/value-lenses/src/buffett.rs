use analysis_core::{AnalysisError, Lens, LensResult, LensScorer, MetricSet};
use serde::{Deserialize, Serialize};

use crate::pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Tier {
    pub fn points(&self) -> f64 {
        match self {
            Tier::Poor => 0.0,
            Tier::Average => 40.0,
            Tier::Good => 70.0,
            Tier::Excellent => 100.0,
        }
    }
}

/// Tier for a metric where higher is better. Excellent is strictly above `excellent`.
fn tier_higher(value: f64, average: f64, good: f64, excellent: f64) -> Tier {
    if value > excellent {
        Tier::Excellent
    } else if value >= good {
        Tier::Good
    } else if value >= average {
        Tier::Average
    } else {
        Tier::Poor
    }
}

pub fn roe_tier(roe: f64) -> Tier {
    tier_higher(roe, 0.08, 0.12, 0.18)
}

pub fn roic_tier(roic: f64) -> Tier {
    tier_higher(roic, 0.08, 0.12, 0.15)
}

pub fn coverage_tier(coverage: f64) -> Tier {
    tier_higher(coverage, 3.0, 5.0, 10.0)
}

pub fn owner_yield_tier(yield_: f64) -> Tier {
    tier_higher(yield_, 0.03, 0.05, 0.08)
}

pub fn debt_tier(debt_to_equity: f64) -> Tier {
    if debt_to_equity < 0.3 {
        Tier::Excellent
    } else if debt_to_equity <= 0.5 {
        Tier::Good
    } else if debt_to_equity <= 1.0 {
        Tier::Average
    } else {
        Tier::Poor
    }
}

/// Business quality and economic moat.
pub struct BuffettLens;

impl LensScorer for BuffettLens {
    fn lens(&self) -> Lens {
        Lens::Buffett
    }

    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError> {
        let roe = metrics.roe();
        let roic = metrics.roic();

        // (tier, weight); undefined metrics are dropped and the rest renormalized
        let components: Vec<(Tier, f64)> = [
            (roe.map(roe_tier), 0.30),
            (roic.map(roic_tier), 0.30),
            (metrics.interest_coverage().map(coverage_tier), 0.15),
            (metrics.debt_to_equity().map(debt_tier), 0.15),
            (metrics.owner_earnings_yield().map(owner_yield_tier), 0.10),
        ]
        .into_iter()
        .filter_map(|(tier, weight)| tier.map(|t| (t, weight)))
        .collect();

        if components.is_empty() {
            return Err(AnalysisError::MissingData(
                "no profitability or balance sheet metrics".to_string(),
            ));
        }

        let total_weight: f64 = components.iter().map(|(_, w)| w).sum();
        let score = components.iter().map(|(t, w)| t.points() * w).sum::<f64>() / total_weight;

        let verdict = if score >= 80.0 {
            "Wonderful Business"
        } else if score >= 60.0 {
            "Good Business"
        } else if score >= 40.0 {
            "Average Business"
        } else {
            "Avoid"
        };

        let key_metric = match (roe, roic) {
            (Some(roe), _) => format!("ROE: {}", pct(roe)),
            (None, Some(roic)) => format!("ROIC: {}", pct(roic)),
            _ => format!("{} metrics", components.len()),
        };

        let mut notes = Vec::new();
        if let Some(roe) = roe {
            notes.push(format!("ROE {} ({:?})", pct(roe), roe_tier(roe)));
        }
        if let Some(roic) = roic {
            notes.push(format!("ROIC {} ({:?})", pct(roic), roic_tier(roic)));
        }
        if let Some(de) = metrics.debt_to_equity() {
            notes.push(format!("D/E {:.2}", de));
        }
        let insight = if notes.is_empty() {
            "Moat assessed from coverage and owner earnings only".to_string()
        } else {
            notes.join(", ")
        };

        Ok(LensResult::new(Lens::Buffett, score, key_metric, verdict, insight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn create_test_metrics() -> MetricSet {
        let mut m = MetricSet::new("BRK", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        m.net_income = Some(200.0);
        m.stockholders_equity = Some(1000.0);
        m
    }

    #[test]
    fn test_roe_tiers() {
        assert_eq!(roe_tier(0.20), Tier::Excellent);
        assert_eq!(roe_tier(0.18), Tier::Good);
        assert_eq!(roe_tier(0.12), Tier::Good);
        assert_eq!(roe_tier(0.10), Tier::Average);
        assert_eq!(roe_tier(0.05), Tier::Poor);
    }

    #[test]
    fn test_roic_and_debt_tiers() {
        assert_eq!(roic_tier(0.16), Tier::Excellent);
        assert_eq!(roic_tier(0.13), Tier::Good);
        assert_eq!(debt_tier(0.2), Tier::Excellent);
        assert_eq!(debt_tier(1.5), Tier::Poor);
    }

    #[test]
    fn test_single_metric_renormalizes() {
        let result = BuffettLens.score(&create_test_metrics()).unwrap();
        // ROE 20% is the only defined metric
        assert_relative_eq!(result.score, 100.0, epsilon = 1e-9);
        assert_eq!(result.key_metric, "ROE: 20.0%");
        assert_eq!(result.verdict, "Wonderful Business");
    }

    #[test]
    fn test_weighted_mix() {
        let mut m = create_test_metrics();
        m.total_debt = Some(1500.0); // D/E 1.5 -> poor
        let result = BuffettLens.score(&m).unwrap();
        // (100*0.30 + 0*0.15) / 0.45
        assert_relative_eq!(result.score, 30.0 / 0.45, epsilon = 1e-9);
    }

    #[test]
    fn test_no_metrics_is_missing_data() {
        let m = MetricSet::new("NONE", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert!(matches!(BuffettLens.score(&m), Err(AnalysisError::MissingData(_))));
    }
}
