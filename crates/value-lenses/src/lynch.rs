use analysis_core::{AnalysisError, Lens, LensResult, LensScorer, MetricSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LynchCategory {
    SlowGrower,
    Stalwart,
    FastGrower,
    Cyclical,
    Turnaround,
    AssetPlay,
}

impl fmt::Display for LynchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LynchCategory::SlowGrower => "Slow Grower",
            LynchCategory::Stalwart => "Stalwart",
            LynchCategory::FastGrower => "Fast Grower",
            LynchCategory::Cyclical => "Cyclical",
            LynchCategory::Turnaround => "Turnaround",
            LynchCategory::AssetPlay => "Asset Play",
        };
        write!(f, "{}", s)
    }
}

/// Earnings volatility above which a company is treated as cyclical.
const CYCLICAL_VOLATILITY: f64 = 0.5;

/// Special situations take precedence over the growth buckets.
pub fn categorize(metrics: &MetricSet) -> LynchCategory {
    if metrics.understated_assets {
        return LynchCategory::AssetPlay;
    }
    if metrics.debt_distress {
        return LynchCategory::Turnaround;
    }
    if metrics.earnings_volatility.map_or(false, |v| v > CYCLICAL_VOLATILITY) {
        return LynchCategory::Cyclical;
    }

    let growth = metrics.earnings_growth_rate.unwrap_or(0.0);
    if growth < 0.05 {
        LynchCategory::SlowGrower
    } else if growth <= 0.12 {
        LynchCategory::Stalwart
    } else {
        LynchCategory::FastGrower
    }
}

fn peg_band(peg: f64) -> (f64, &'static str) {
    if peg < 0.5 {
        (95.0, "Strong Buy")
    } else if peg < 1.0 {
        (80.0, "Buy")
    } else if peg < 1.5 {
        (60.0, "Hold")
    } else if peg < 2.0 {
        (40.0, "Expensive")
    } else {
        (20.0, "Avoid")
    }
}

/// Growth at a reasonable price.
pub struct LynchLens;

impl LensScorer for LynchLens {
    fn lens(&self) -> Lens {
        Lens::Lynch
    }

    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError> {
        let peg = metrics.peg_ratio().ok_or_else(|| {
            AnalysisError::MissingData("PEG needs positive earnings and growth".to_string())
        })?;

        let (score, verdict) = peg_band(peg);
        let category = categorize(metrics);

        let mut insight = format!("{}", category);
        if let Some(growth) = metrics.earnings_growth_rate {
            insight.push_str(&format!(" growing earnings {} a year", pct(growth)));
        }
        if let Some(net_cash) = metrics.net_cash_per_share() {
            insight.push_str(&format!("; net cash ${:.2}/share", net_cash));
        }

        Ok(LensResult::new(
            Lens::Lynch,
            score,
            format!("PEG: {:.2}", peg),
            verdict,
            insight,
        ))
    }
}
