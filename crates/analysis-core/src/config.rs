use serde::{Deserialize, Serialize};

use crate::WeightProfile;

/// Tunables for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lens weighting used by the quality scorer
    pub weighting: WeightProfile,
    /// Maximum price / conservative value ratio that counts as a margin of safety
    pub required_mos: f64,

    // Valuation assumptions
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub dcf_years: u32,
    pub risk_free_rate: f64,
    pub required_return: f64,
    pub default_industry_pe: f64,

    /// Graham's "adequate size" revenue floor
    pub graham_min_revenue: f64,
    /// Fewer surviving valuation methods than this yields INSUFFICIENT_DATA
    pub min_valuation_methods: usize,

    /// Max tickers analyzed concurrently
    pub concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weighting: WeightProfile::default(),
            required_mos: 0.70,
            discount_rate: 0.10,
            terminal_growth: 0.03,
            dcf_years: 10,
            risk_free_rate: 0.04,
            required_return: 0.10,
            default_industry_pe: 15.0,
            graham_min_revenue: 2_000_000_000.0,
            min_valuation_methods: 1,
            concurrency: 16,
        }
    }
}
