use analysis_core::{stats, CompositeValuationRange, ValuationRange, ValueConfidence};

/// Blends per-method ranges into one composite range.
///
/// Conservative is the minimum of the method conservatives, base is the
/// confidence-weighted mean of the bases and optimistic is the plain mean of the
/// optimistic values, raised to base if the weighting pulls base above it.
/// Returns `None` when no method is usable.
pub fn composite_range(ranges: &[ValuationRange], quality: f64) -> Option<CompositeValuationRange> {
    let usable: Vec<ValuationRange> = ranges.iter().filter(|r| r.is_usable()).cloned().collect();
    if usable.is_empty() {
        return None;
    }

    let conservative = usable
        .iter()
        .map(|r| r.conservative)
        .fold(f64::INFINITY, f64::min);

    let total_weight: f64 = usable.iter().map(|r| r.confidence.weight()).sum();
    let base = usable
        .iter()
        .map(|r| r.base * r.confidence.weight())
        .sum::<f64>()
        / total_weight;

    let optimistic = (usable.iter().map(|r| r.optimistic).sum::<f64>() / usable.len() as f64).max(base);

    let confidence = composite_confidence(&usable, quality);

    Some(CompositeValuationRange {
        conservative,
        base,
        optimistic,
        confidence,
        methods: usable,
    })
}

/// Confidence from method agreement, business quality and method count.
pub fn composite_confidence(ranges: &[ValuationRange], quality: f64) -> ValueConfidence {
    let bases: Vec<f64> = ranges.iter().map(|r| r.base).collect();

    let agreement = match stats::coefficient_of_variation(&bases) {
        Some(cv) if cv < 0.2 => 40.0,
        Some(cv) if cv < 0.4 => 25.0,
        Some(cv) if cv < 0.6 => 10.0,
        _ => 0.0,
    };
    let quality_points = quality.clamp(0.0, 100.0) * 0.4;
    let coverage_points = (ranges.len() as f64 * 5.0).min(20.0);

    let points = agreement + quality_points + coverage_points;
    if points >= 70.0 {
        ValueConfidence::High
    } else if points >= 50.0 {
        ValueConfidence::Medium
    } else if points >= 30.0 {
        ValueConfidence::Low
    } else {
        ValueConfidence::Speculative
    }
}
