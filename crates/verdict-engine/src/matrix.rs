use analysis_core::{MarginOfSafety, Verdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// High ≥ 70, Medium 50-70, Low < 50.
    pub fn from_score(quality: f64) -> Self {
        if quality >= 70.0 {
            QualityTier::High
        } else if quality >= 50.0 {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

/// Price / conservative value bands. Each band includes its lower edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MosBand {
    /// < 0.5
    DeepDiscount,
    /// 0.5 - 0.7
    Discount,
    /// 0.7 - 1.0
    BelowValue,
    /// 1.0 - 1.2
    NearValue,
    /// 1.2 - 1.5
    Overvalued,
    /// ≥ 1.5
    FarOvervalued,
}

impl MosBand {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.5 {
            MosBand::DeepDiscount
        } else if ratio < 0.7 {
            MosBand::Discount
        } else if ratio < 1.0 {
            MosBand::BelowValue
        } else if ratio < 1.2 {
            MosBand::NearValue
        } else if ratio < 1.5 {
            MosBand::Overvalued
        } else {
            MosBand::FarOvervalued
        }
    }
}

/// The (quality tier, MoS band) lookup table.
pub fn matrix_verdict(tier: QualityTier, band: MosBand) -> Verdict {
    use MosBand::*;
    use QualityTier::*;

    match (tier, band) {
        (High, DeepDiscount) => Verdict::StrongBuy,
        (High, Discount) => Verdict::Buy,
        (High, BelowValue) => Verdict::Accumulate,
        (High, NearValue) | (High, Overvalued) => Verdict::Watchlist,

        (Medium, DeepDiscount) | (Medium, Discount) => Verdict::Buy,
        (Medium, BelowValue) | (Medium, NearValue) => Verdict::Hold,
        (Medium, Overvalued) => Verdict::Reduce,

        (Low, DeepDiscount) | (Low, Discount) | (Low, BelowValue) => Verdict::Accumulate,
        (Low, NearValue) => Verdict::Avoid,
        (Low, Overvalued) => Verdict::Reduce,

        (_, FarOvervalued) => Verdict::Sell,
    }
}

/// Final verdict for a ticker.
///
/// Without a quality score or a margin-of-safety reading the answer is
/// INSUFFICIENT_DATA. A high-quality company that misses the required margin
/// of safety is never a buy; it goes on the watchlist instead.
pub fn decide(quality: Option<f64>, mos: Option<&MarginOfSafety>) -> Verdict {
    let (quality, mos) = match (quality, mos) {
        (Some(q), Some(m)) if q.is_finite() && m.ratio.is_finite() => (q, m),
        _ => return Verdict::InsufficientData,
    };

    let tier = QualityTier::from_score(quality);
    let verdict = matrix_verdict(tier, MosBand::from_ratio(mos.ratio));

    if tier == QualityTier::High && !mos.has_margin && verdict.is_buy_side() {
        Verdict::Watchlist
    } else {
        verdict
    }
}
