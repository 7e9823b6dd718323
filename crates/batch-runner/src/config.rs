use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use analysis_core::{EngineConfig, InvestmentStyle, LensWeights, WeightProfile};

/// Settings for one batch run, read from the environment (and `.env`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub engine: EngineConfig,
    /// JSON file holding an array of metric sets
    pub input_path: Option<String>,
    /// Picks printed; 0 prints all
    pub top_n: usize,
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        let weighting = match lookup("MOSEE_WEIGHTS") {
            Some(raw) => WeightProfile::Custom(parse_weights(&raw)?),
            None => {
                let style: InvestmentStyle = var("MOSEE_STYLE", "BALANCED".to_string())
                    .parse()
                    .context("MOSEE_STYLE")?;
                WeightProfile::Preset(style)
            }
        };

        let engine = EngineConfig {
            weighting,
            required_mos: var("MOSEE_REQUIRED_MOS", defaults.required_mos.to_string())
                .parse()
                .context("MOSEE_REQUIRED_MOS")?,
            discount_rate: var("MOSEE_DISCOUNT_RATE", defaults.discount_rate.to_string())
                .parse()
                .context("MOSEE_DISCOUNT_RATE")?,
            terminal_growth: var("MOSEE_TERMINAL_GROWTH", defaults.terminal_growth.to_string())
                .parse()
                .context("MOSEE_TERMINAL_GROWTH")?,
            dcf_years: var("MOSEE_DCF_YEARS", defaults.dcf_years.to_string())
                .parse()
                .context("MOSEE_DCF_YEARS")?,
            risk_free_rate: var("MOSEE_RISK_FREE_RATE", defaults.risk_free_rate.to_string())
                .parse()
                .context("MOSEE_RISK_FREE_RATE")?,
            required_return: var("MOSEE_REQUIRED_RETURN", defaults.required_return.to_string())
                .parse()
                .context("MOSEE_REQUIRED_RETURN")?,
            default_industry_pe: var("MOSEE_INDUSTRY_PE", defaults.default_industry_pe.to_string())
                .parse()
                .context("MOSEE_INDUSTRY_PE")?,
            graham_min_revenue: var("MOSEE_GRAHAM_MIN_REVENUE", defaults.graham_min_revenue.to_string())
                .parse()
                .context("MOSEE_GRAHAM_MIN_REVENUE")?,
            min_valuation_methods: var("MOSEE_MIN_METHODS", defaults.min_valuation_methods.to_string())
                .parse()
                .context("MOSEE_MIN_METHODS")?,
            concurrency: var("MOSEE_CONCURRENCY", defaults.concurrency.to_string())
                .parse()
                .context("MOSEE_CONCURRENCY")?,
        };

        let config = Self {
            engine,
            input_path: lookup("MOSEE_INPUT"),
            top_n: var("MOSEE_TOP_N", "0".to_string()).parse().context("MOSEE_TOP_N")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let e = &self.engine;
        ensure!(
            e.required_mos > 0.0 && e.required_mos <= 1.0,
            "MOSEE_REQUIRED_MOS must be in (0, 1], got {}",
            e.required_mos
        );
        ensure!(
            e.discount_rate > e.terminal_growth,
            "discount rate {} must exceed terminal growth {}",
            e.discount_rate,
            e.terminal_growth
        );
        ensure!(e.dcf_years > 0, "MOSEE_DCF_YEARS must be positive");
        ensure!(e.concurrency > 0, "MOSEE_CONCURRENCY must be positive");
        Ok(())
    }
}

/// `graham,buffett,lynch,greenblatt,fisher`, e.g. `0.3,0.3,0.1,0.2,0.1`.
/// The sum is checked when the engine is built.
fn parse_weights(raw: &str) -> Result<LensWeights> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("MOSEE_WEIGHTS '{}' is not a list of numbers", raw))?;
    let &[graham, buffett, lynch, greenblatt, fisher] = values.as_slice() else {
        bail!("MOSEE_WEIGHTS needs 5 weights, got {}", values.len());
    };
    Ok(LensWeights {
        graham,
        buffett,
        lynch,
        greenblatt,
        fisher,
    })
}
