//! Per-ticker analysis: lenses, quality, valuation range, margin of safety and
//! the final verdict, assembled into one immutable `StockAnalysisRecord`.

pub mod insights;
pub mod matrix;

pub use matrix::{decide, matrix_verdict, MosBand, QualityTier};

use analysis_core::{AnalysisError, EngineConfig, MetricSet, StockAnalysisRecord, ValuationRange, Verdict};
use quality_scorer::QualityScorer;
use valuation_range::{composite_range, confidence, evaluate_margin, method_scores, ValuationBuilder};
use value_lenses::LensSet;

pub struct VerdictEngine {
    lenses: LensSet,
    scorer: QualityScorer,
    valuation: ValuationBuilder,
    required_mos: f64,
    min_valuation_methods: usize,
}

impl Default for VerdictEngine {
    fn default() -> Self {
        Self {
            lenses: LensSet::new(),
            scorer: QualityScorer::default(),
            valuation: ValuationBuilder::default(),
            required_mos: EngineConfig::default().required_mos,
            min_valuation_methods: EngineConfig::default().min_valuation_methods,
        }
    }
}

impl VerdictEngine {
    /// Fails only if the configured custom weights are invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            lenses: LensSet::from_config(config),
            scorer: QualityScorer::from_profile(&config.weighting)?,
            valuation: ValuationBuilder::from_config(config),
            required_mos: config.required_mos,
            min_valuation_methods: config.min_valuation_methods.max(1),
        })
    }

    /// Runs the whole per-ticker pipeline. Never fails: missing inputs surface
    /// as an INSUFFICIENT_DATA verdict on the returned record.
    pub fn analyze(&self, metrics: &MetricSet) -> StockAnalysisRecord {
        let perspectives = self.lenses.score_all(metrics);

        let quality = match self.scorer.score(&perspectives) {
            Ok(q) => Some(q),
            Err(e) => {
                tracing::debug!("No quality score for {}: {}", metrics.ticker, e);
                None
            }
        };

        // Only ranges that can enter the composite are reported or scored
        let ranges: Vec<ValuationRange> = quality
            .as_ref()
            .map(|q| self.valuation.method_ranges(metrics, q.total))
            .unwrap_or_default()
            .into_iter()
            .filter(|r| {
                let usable = r.is_usable();
                if !usable {
                    tracing::debug!("{} valuation unusable for {}", r.method, metrics.ticker);
                }
                usable
            })
            .collect();
        let usable = ranges.len();
        let valuation = match &quality {
            Some(q) if usable >= self.min_valuation_methods => composite_range(&ranges, q.total),
            _ => None,
        };

        let mos = valuation
            .as_ref()
            .and_then(|v| evaluate_margin(metrics.price(), v.conservative, self.required_mos));

        let verdict = decide(quality.as_ref().map(|q| q.total), mos.as_ref());

        let strengths = insights::strengths(metrics, quality.as_ref(), mos.as_ref(), &perspectives);
        let mut concerns =
            insights::concerns(metrics, quality.as_ref(), mos.as_ref(), valuation.as_ref(), &perspectives);
        if verdict == Verdict::InsufficientData {
            concerns.insert(0, insufficient_reason(metrics, quality.is_some(), usable, self.min_valuation_methods));
        }
        let action_items = insights::action_items(verdict, &metrics.ticker, mos.as_ref());

        let methods = valuation.as_ref().map(|v| v.methods.clone()).unwrap_or_default();
        let (confidence_level, confidence_score) = confidence::assess(metrics, &methods);

        tracing::debug!(
            "{}: {} (quality {:?}, mos {:?})",
            metrics.ticker,
            verdict,
            quality.as_ref().map(|q| q.total),
            mos.as_ref().map(|m| m.ratio)
        );

        StockAnalysisRecord {
            ticker: metrics.ticker.clone(),
            analysis_date: metrics.analysis_date,
            current_price: metrics.price(),
            verdict,
            recommendation: verdict.recommendation().to_string(),
            quality_grade: quality.as_ref().map(|q| q.grade),
            quality_score: quality.as_ref().map(|q| q.total),
            quality_breakdown: quality.as_ref().map(|q| q.breakdown.clone()).unwrap_or_default(),
            investment_style: self.scorer.style().to_string(),
            valuation_conservative: valuation.as_ref().map(|v| v.conservative),
            valuation_base: valuation.as_ref().map(|v| v.base),
            valuation_optimistic: valuation.as_ref().map(|v| v.optimistic),
            valuation_confidence: valuation.as_ref().map(|v| v.confidence),
            method_scores: method_scores(metrics, &ranges),
            valuation_methods: ranges,
            margin_of_safety: mos.map(|m| m.ratio),
            has_margin_of_safety: mos.map_or(false, |m| m.has_margin),
            buy_below_price: mos.map(|m| m.buy_below_price),
            earnings_yield: metrics.earnings_yield(),
            return_on_capital: metrics.return_on_capital(),
            perspectives,
            strengths,
            concerns,
            action_items,
            confidence_level,
            confidence_score,
            country: metrics.country.clone(),
            industry: metrics.industry.clone(),
            cap_size: metrics.cap_size.clone(),
        }
    }
}

fn insufficient_reason(metrics: &MetricSet, has_quality: bool, usable_methods: usize, required: usize) -> String {
    if !has_quality {
        "Insufficient data: no lens could be scored".to_string()
    } else if usable_methods < required {
        format!(
            "Insufficient data: {} usable valuation method(s), {} required",
            usable_methods, required
        )
    } else if metrics.price().is_none() {
        "Insufficient data: no current price".to_string()
    } else {
        "Insufficient data: conservative value is not positive".to_string()
    }
}
