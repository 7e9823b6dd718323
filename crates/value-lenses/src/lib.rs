//! Five investing-philosophy lenses over a single company's `MetricSet`.
//!
//! Each lens is a unit of pure scoring behind `LensScorer`. `LensSet` bundles the
//! closed set so callers never need to know which lenses exist.

pub mod buffett;
pub mod fisher;
pub mod graham;
pub mod greenblatt;
pub mod lynch;

pub use buffett::BuffettLens;
pub use fisher::FisherLens;
pub use graham::GrahamLens;
pub use greenblatt::GreenblattLens;
pub use lynch::{LynchCategory, LynchLens};

use analysis_core::{EngineConfig, Lens, LensResult, LensScorer, MetricSet};

pub struct LensSet {
    graham: GrahamLens,
    buffett: BuffettLens,
    lynch: LynchLens,
    greenblatt: GreenblattLens,
    fisher: FisherLens,
}

impl LensSet {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            graham: GrahamLens::new(config.graham_min_revenue),
            buffett: BuffettLens,
            lynch: LynchLens,
            greenblatt: GreenblattLens,
            fisher: FisherLens,
        }
    }

    pub fn scorer(&self, lens: Lens) -> &dyn LensScorer {
        match lens {
            Lens::Graham => &self.graham,
            Lens::Buffett => &self.buffett,
            Lens::Lynch => &self.lynch,
            Lens::Greenblatt => &self.greenblatt,
            Lens::Fisher => &self.fisher,
        }
    }

    /// Scores every lens, dropping the ones whose inputs are missing.
    pub fn score_all(&self, metrics: &MetricSet) -> Vec<LensResult> {
        Lens::ALL
            .iter()
            .filter_map(|lens| match self.scorer(*lens).score(metrics) {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::debug!("{} lens skipped for {}: {}", lens, metrics.ticker, e);
                    None
                }
            })
            .collect()
    }
}

impl Default for LensSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a decimal ratio as a percentage string.
pub fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_metrics_skip_every_lens_but_graham() {
        let lenses = LensSet::new();
        let mut metrics = MetricSet::new("EMPTY", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert!(lenses.score_all(&metrics).is_empty());

        metrics.current_price = Some(25.0);
        let results = lenses.score_all(&metrics);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lens, Lens::Graham);
        assert_eq!(results[0].score, 0.0);
    }

    #[test]
    fn test_pct_formatting() {
        assert_eq!(pct(0.185), "18.5%");
        assert_eq!(pct(-0.05), "-5.0%");
    }

    #[test]
    fn test_scorer_dispatch_matches_lens() {
        let lenses = LensSet::new();
        for lens in Lens::ALL {
            assert_eq!(lenses.scorer(lens).lens(), lens);
        }
    }
}
