use analysis_core::{stats, ConfidenceLevel, MetricSet, ValuationRange};

/// Share of core fields present, 0-100.
pub fn data_completeness_score(metrics: &MetricSet) -> f64 {
    metrics.completeness() * 100.0
}

/// Agreement between the method base values, 0-100.
pub fn method_consistency_score(ranges: &[ValuationRange]) -> f64 {
    if ranges.len() < 2 {
        return 30.0;
    }
    let bases: Vec<f64> = ranges.iter().map(|r| r.base).collect();
    let cv = match stats::coefficient_of_variation(&bases) {
        Some(cv) => cv,
        None => return 0.0,
    };

    if cv < 0.2 {
        100.0
    } else if cv < 0.5 {
        70.0 + (0.5 - cv) * 100.0
    } else if cv < 1.0 {
        40.0 + (1.0 - cv) * 60.0
    } else {
        (40.0 - (cv - 1.0) * 20.0).max(0.0)
    }
}

/// Overall confidence in an analysis: equal parts data completeness and method agreement.
pub fn assess(metrics: &MetricSet, ranges: &[ValuationRange]) -> (ConfidenceLevel, f64) {
    let score = 0.5 * data_completeness_score(metrics) + 0.5 * method_consistency_score(ranges);
    (ConfidenceLevel::from_score(score), score)
}
