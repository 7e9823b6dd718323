use analysis_core::{AnalysisError, Lens, LensResult, LensScorer, MetricSet};

use crate::pct;

fn earnings_yield_points(ey: f64) -> f64 {
    if ey >= 0.15 {
        50.0
    } else if ey >= 0.10 {
        40.0
    } else if ey >= 0.07 {
        28.0
    } else if ey >= 0.05 {
        18.0
    } else {
        0.0
    }
}

fn return_on_capital_points(roc: f64) -> f64 {
    if roc >= 0.30 {
        50.0
    } else if roc >= 0.20 {
        40.0
    } else if roc >= 0.15 {
        30.0
    } else if roc >= 0.10 {
        20.0
    } else {
        0.0
    }
}

/// Magic Formula inputs scored against absolute bands.
///
/// The universe-relative rank needs every ticker and is computed by the
/// cross-sectional ranker after all per-ticker work is done.
pub struct GreenblattLens;

impl LensScorer for GreenblattLens {
    fn lens(&self) -> Lens {
        Lens::Greenblatt
    }

    fn score(&self, metrics: &MetricSet) -> Result<LensResult, AnalysisError> {
        let ey = metrics.earnings_yield();
        let roc = metrics.return_on_capital();
        if ey.is_none() && roc.is_none() {
            return Err(AnalysisError::MissingData(
                "earnings yield and return on capital undefined".to_string(),
            ));
        }

        // Each half is worth 50; a lone defined half is scaled to the full range
        let score = match (ey, roc) {
            (Some(ey), Some(roc)) => earnings_yield_points(ey) + return_on_capital_points(roc),
            (Some(ey), None) => earnings_yield_points(ey) * 2.0,
            (None, Some(roc)) => return_on_capital_points(roc) * 2.0,
            (None, None) => 0.0,
        };

        let verdict = if score >= 80.0 {
            "Strong Buy"
        } else if score >= 60.0 {
            "Buy"
        } else if score >= 40.0 {
            "Hold"
        } else {
            "Avoid"
        };

        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), pct);
        let key_metric = format!("EY: {} | ROC: {}", fmt_opt(ey), fmt_opt(roc));
        let insight = match (ey, roc) {
            (Some(ey), Some(roc)) if ey >= 0.10 && roc >= 0.20 => {
                "Good business at a cheap price".to_string()
            }
            (_, Some(roc)) if roc >= 0.20 => "Good business, price not yet cheap".to_string(),
            (Some(ey), _) if ey >= 0.10 => "Cheap, but returns on capital are modest".to_string(),
            _ => "Neither cheap nor high-return".to_string(),
        };

        Ok(LensResult::new(Lens::Greenblatt, score, key_metric, verdict, insight))
    }
}
