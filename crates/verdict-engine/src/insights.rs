use analysis_core::{
    CompositeValuationRange, LensResult, MarginOfSafety, MetricSet, QualityScore, ValueConfidence, Verdict,
};
use value_lenses::pct;

pub fn strengths(
    metrics: &MetricSet,
    quality: Option<&QualityScore>,
    mos: Option<&MarginOfSafety>,
    perspectives: &[LensResult],
) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(q) = quality.filter(|q| q.total >= 70.0) {
        items.push(format!("High quality score: {:.0}/100 ({})", q.total, q.grade));
    }
    if let Some(roe) = metrics.roe().filter(|r| *r > 0.18) {
        items.push(format!("Excellent return on equity: {}", pct(roe)));
    }
    if let Some(roic) = metrics.roic().filter(|r| *r > 0.15) {
        items.push(format!("Strong return on invested capital: {}", pct(roic)));
    }
    if let Some(m) = mos.filter(|m| m.has_margin) {
        items.push(format!("Margin of safety: trading at {:.0}% of conservative value", m.ratio * 100.0));
    }
    if let Some(peg) = metrics.peg_ratio().filter(|p| *p < 1.0) {
        items.push(format!("Attractive PEG ratio: {:.2}", peg));
    }
    if let Some(coverage) = metrics.interest_coverage().filter(|c| *c >= 5.0) {
        items.push(format!("Comfortable interest coverage: {:.1}x", coverage));
    }
    for lens in perspectives.iter().filter(|l| l.score >= 80.0) {
        items.push(format!("{} view: {} ({})", lens.lens, lens.verdict, lens.key_metric));
    }

    items
}

pub fn concerns(
    metrics: &MetricSet,
    quality: Option<&QualityScore>,
    mos: Option<&MarginOfSafety>,
    valuation: Option<&CompositeValuationRange>,
    perspectives: &[LensResult],
) -> Vec<String> {
    let mut items = Vec::new();

    match mos {
        Some(m) if m.ratio > 1.0 => items.push(format!(
            "No margin of safety: price is {:.0}% of conservative value",
            m.ratio * 100.0
        )),
        Some(m) if !m.has_margin => items.push(format!(
            "Margin of safety thinner than required: needs price at or below {:.0}% of conservative value",
            m.required * 100.0
        )),
        _ => {}
    }
    if let Some(q) = quality.filter(|q| q.total < 50.0) {
        items.push(format!("Low quality score: {:.0}/100 ({})", q.total, q.grade));
    }
    if let Some(de) = metrics.debt_to_equity().filter(|d| *d > 1.0) {
        items.push(format!("High leverage: debt/equity {:.2}", de));
    }
    if let Some(roe) = metrics.roe().filter(|r| *r < 0.08) {
        items.push(format!("Weak return on equity: {}", pct(roe)));
    }
    if let Some(growth) = metrics.earnings_growth_rate.filter(|g| *g < 0.0) {
        items.push(format!("Earnings expected to shrink: {}", pct(growth)));
    }
    if let Some(v) = valuation {
        if matches!(v.confidence, ValueConfidence::Low | ValueConfidence::Speculative) {
            items.push("Valuation methods disagree; treat the range with caution".to_string());
        }
    }
    for lens in perspectives.iter().filter(|l| l.score < 30.0) {
        items.push(format!("{} view: {} ({})", lens.lens, lens.verdict, lens.key_metric));
    }

    items
}

pub fn action_items(verdict: Verdict, ticker: &str, mos: Option<&MarginOfSafety>) -> Vec<String> {
    let buy_below = mos
        .map(|m| format!("${:.2}", m.buy_below_price))
        .unwrap_or_else(|| "the margin-of-safety price".to_string());

    match verdict {
        Verdict::StrongBuy | Verdict::Buy => vec![
            format!("Consider initiating or adding to a position in {}", ticker),
            "Review position sizing relative to the portfolio".to_string(),
        ],
        Verdict::Accumulate => vec![
            "Consider a small position, adding on further weakness".to_string(),
            format!("Set an alert for prices below {}", buy_below),
        ],
        Verdict::Watchlist => vec![
            "Add to watchlist: quality company that needs a better price".to_string(),
            format!("Set a price alert at {} for a margin of safety", buy_below),
            "Monitor quarterly results for deterioration".to_string(),
        ],
        Verdict::Hold => vec![
            "No action needed if already owned".to_string(),
            "Do not add at current prices".to_string(),
        ],
        Verdict::Reduce => vec![
            "Consider trimming if the position is overweight".to_string(),
            "Lock in some gains if the position has appreciated substantially".to_string(),
        ],
        Verdict::Sell => vec![
            "Consider exiting: overvalued relative to conservative value".to_string(),
            "Reallocate capital to better opportunities".to_string(),
        ],
        Verdict::Avoid => vec!["Do not invest: poor risk/reward".to_string()],
        Verdict::InsufficientData => vec![format!("Gather missing fundamentals for {} before evaluating", ticker)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Grade, Lens};
    use chrono::NaiveDate;

    fn create_test_metrics() -> MetricSet {
        let mut m = MetricSet::new("INS", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        m.net_income = Some(200.0);
        m.stockholders_equity = Some(1000.0);
        m
    }

    fn quality(total: f64) -> QualityScore {
        QualityScore {
            total,
            grade: Grade::from_score(total),
            breakdown: vec![],
            style: "BALANCED".to_string(),
        }
    }

    fn mos(ratio: f64) -> MarginOfSafety {
        MarginOfSafety {
            ratio,
            has_margin: ratio <= 0.7,
            buy_below_price: 70.0,
            required: 0.7,
        }
    }

    #[test]
    fn test_high_roe_is_strength() {
        let items = strengths(&create_test_metrics(), Some(&quality(75.0)), Some(&mos(0.6)), &[]);
        assert!(items.iter().any(|s| s.contains("return on equity")));
        assert!(items.iter().any(|s| s.starts_with("High quality score")));
        assert!(items.iter().any(|s| s.starts_with("Margin of safety")));
    }

    #[test]
    fn test_overvaluation_is_concern() {
        let items = concerns(&create_test_metrics(), Some(&quality(40.0)), Some(&mos(1.3)), None, &[]);
        assert!(items.iter().any(|c| c.starts_with("No margin of safety")));
        assert!(items.iter().any(|c| c.starts_with("Low quality score")));
    }

    #[test]
    fn test_thin_margin_concern() {
        let items = concerns(&create_test_metrics(), None, Some(&mos(0.85)), None, &[]);
        assert_eq!(items.len(), 1);
        assert!(items[0].starts_with("Margin of safety thinner"));
    }

    #[test]
    fn test_weak_lens_is_concern() {
        let weak = LensResult::new(Lens::Lynch, 20.0, "PEG: 3.00", "Avoid", "");
        let items = concerns(&create_test_metrics(), None, None, None, &[weak]);
        assert_eq!(items, vec!["Lynch view: Avoid (PEG: 3.00)".to_string()]);
    }

    #[test]
    fn test_action_items_per_verdict() {
        let watch = action_items(Verdict::Watchlist, "ABC", Some(&mos(0.9)));
        assert_eq!(watch.len(), 3);
        assert!(watch[1].contains("$70.00"));

        let buy = action_items(Verdict::Buy, "ABC", None);
        assert!(buy[0].contains("ABC"));
        assert_eq!(action_items(Verdict::Avoid, "ABC", None).len(), 1);
    }
}
