//! Composite quality score: a style-weighted blend of the five lens scores.

use analysis_core::{
    AnalysisError, ComponentScore, Grade, InvestmentStyle, Lens, LensResult, LensWeights,
    QualityScore, WeightProfile,
};

/// Tolerance for custom weights summing to 1.0
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Preset weights per investment style.
pub fn style_weights(style: InvestmentStyle) -> LensWeights {
    let (graham, buffett, lynch, greenblatt, fisher) = match style {
        InvestmentStyle::DeepValue => (0.35, 0.25, 0.10, 0.20, 0.10),
        InvestmentStyle::QualityValue => (0.15, 0.40, 0.15, 0.15, 0.15),
        InvestmentStyle::Garp => (0.15, 0.20, 0.35, 0.10, 0.20),
        InvestmentStyle::MagicFormula => (0.10, 0.15, 0.15, 0.45, 0.15),
        InvestmentStyle::Growth => (0.10, 0.15, 0.25, 0.10, 0.40),
        InvestmentStyle::Balanced => (0.20, 0.20, 0.20, 0.20, 0.20),
    };
    LensWeights { graham, buffett, lynch, greenblatt, fisher }
}

/// Rejects weightings that are negative, non-finite or do not sum to 1.0.
pub fn validate_weights(weights: &LensWeights) -> Result<(), AnalysisError> {
    for lens in Lens::ALL {
        let w = weights.get(lens);
        if !w.is_finite() || w < 0.0 {
            return Err(AnalysisError::InvalidWeights(format!("{} weight {} is not a valid weight", lens, w)));
        }
    }
    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(AnalysisError::InvalidWeights(format!("weights sum to {:.4}, expected 1.0", sum)));
    }
    Ok(())
}

/// Composite quality of `results` under a preset or custom weighting.
pub fn composite(results: &[LensResult], profile: &WeightProfile) -> Result<QualityScore, AnalysisError> {
    QualityScorer::from_profile(profile)?.score(results)
}

/// Applies one weighting to lens results.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    weights: LensWeights,
    style: String,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::for_style(InvestmentStyle::Balanced)
    }
}

impl QualityScorer {
    pub fn for_style(style: InvestmentStyle) -> Self {
        Self {
            weights: style_weights(style),
            style: style.name().to_string(),
        }
    }

    /// Create scorer with custom weights
    pub fn with_weights(weights: LensWeights) -> Result<Self, AnalysisError> {
        validate_weights(&weights)?;
        Ok(Self {
            weights,
            style: "CUSTOM".to_string(),
        })
    }

    pub fn from_profile(profile: &WeightProfile) -> Result<Self, AnalysisError> {
        match profile {
            WeightProfile::Preset(style) => Ok(Self::for_style(*style)),
            WeightProfile::Custom(weights) => Self::with_weights(*weights),
        }
    }

    pub fn weights(&self) -> &LensWeights {
        &self.weights
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Weighted mean of the available lens scores.
    ///
    /// Lenses without a result are left out and the remaining weights are
    /// renormalized, so a missing lens never counts as a zero.
    pub fn score(&self, results: &[LensResult]) -> Result<QualityScore, AnalysisError> {
        let mut breakdown = Vec::new();
        for lens in Lens::ALL {
            if let Some(result) = results.iter().find(|r| r.lens == lens) {
                let weight = self.weights.get(lens);
                breakdown.push(ComponentScore {
                    lens,
                    score: result.score,
                    weight,
                    weighted_score: result.score * weight,
                });
            }
        }

        let active_weight: f64 = breakdown.iter().map(|c| c.weight).sum();
        if breakdown.is_empty() || active_weight <= 0.0 {
            return Err(AnalysisError::InsufficientData("no weighted lens results".to_string()));
        }
        if breakdown.len() < Lens::ALL.len() {
            tracing::debug!(
                "Quality score from {}/{} lenses, renormalizing weight {:.2}",
                breakdown.len(),
                Lens::ALL.len(),
                active_weight
            );
        }

        let total = (breakdown.iter().map(|c| c.weighted_score).sum::<f64>() / active_weight)
            .clamp(0.0, 100.0);

        Ok(QualityScore {
            total,
            grade: Grade::from_score(total),
            breakdown,
            style: self.style.clone(),
        })
    }
}
