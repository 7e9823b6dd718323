//! Individual valuation methods. Every method returns per-share values and
//! `None` when its inputs are missing or invalid.

use analysis_core::{stats, MetricSet, ValuationMethod, ValuationRange, ValueConfidence};

use crate::ValuationAssumptions;

/// Multiple applied to owner earnings when the required return does not exceed growth.
const PERPETUITY_CAP_MULTIPLE: f64 = 20.0;

/// Half-width of the band put around a point estimate, by quality score.
pub fn quality_uncertainty(quality: f64) -> f64 {
    if quality >= 80.0 {
        0.15
    } else if quality >= 60.0 {
        0.25
    } else if quality >= 40.0 {
        0.35
    } else {
        0.50
    }
}

/// Present value of `years` of growing cash flow plus a Gordon terminal value.
/// The terminal value is dropped when the discount rate does not exceed terminal growth.
pub fn discounted_cash_flow(cash_flow: f64, growth: f64, discount: f64, terminal_growth: f64, years: u32) -> f64 {
    let years = years as i32;
    let projected: f64 = (1..=years)
        .map(|i| cash_flow * (1.0_f64 + growth).powi(i) / (1.0_f64 + discount).powi(i))
        .sum();

    let terminal_pv = if discount > terminal_growth {
        let terminal_value =
            cash_flow * (1.0_f64 + growth).powi(years) * (1.0 + terminal_growth) / (discount - terminal_growth);
        terminal_value / (1.0_f64 + discount).powi(years)
    } else {
        0.0
    };

    projected + terminal_pv
}

/// DCF on free cash flow per share with stressed and favorable scenarios.
pub fn dcf_range(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<ValuationRange> {
    let shares = metrics.shares_outstanding.filter(|s| *s > 0.0)?;
    let fcf_per_share = metrics.free_cash_flow? / shares;
    if fcf_per_share <= 0.0 {
        return None;
    }
    let growth = metrics.earnings_growth_rate?.clamp(-0.05, 0.25);
    let r = assumptions.discount_rate;
    let tg = assumptions.terminal_growth;
    let years = assumptions.dcf_years;

    // Growth shifts by 30% of its magnitude so negative growth is stressed in the right direction
    let conservative = discounted_cash_flow(
        fcf_per_share * 0.9,
        growth - growth.abs() * 0.3,
        r + 0.02,
        tg * 0.8,
        years,
    );
    let base = discounted_cash_flow(fcf_per_share, growth, r, tg, years);
    let optimistic_tg = tg * 1.2;
    let optimistic = discounted_cash_flow(
        fcf_per_share * 1.1,
        growth + growth.abs() * 0.3,
        (r - 0.02).max(optimistic_tg + 0.01),
        optimistic_tg,
        years,
    );

    Some(
        ValuationRange::new(ValuationMethod::Dcf, conservative, base, optimistic, ValueConfidence::Medium)
            .with_assumption(format!("FCF/share ${:.2}, growth {:.1}%", fcf_per_share, growth * 100.0))
            .with_assumption(format!("Discount {:.1}%, terminal growth {:.1}%", r * 100.0, tg * 100.0)),
    )
}

fn quality_pe_multiple(quality: f64) -> f64 {
    if quality >= 80.0 {
        1.5
    } else if quality >= 60.0 {
        1.2
    } else if quality >= 40.0 {
        1.0
    } else {
        0.7
    }
}

/// EPS times a fair P/E adjusted for quality and growth.
pub fn earnings_range(metrics: &MetricSet, quality: f64, assumptions: &ValuationAssumptions) -> Option<ValuationRange> {
    let eps = metrics.eps.filter(|e| *e > 0.0)?;
    let industry_pe = metrics
        .industry_pe
        .filter(|pe| *pe > 0.0)
        .unwrap_or(assumptions.default_industry_pe);
    let growth_multiple = (1.0 + metrics.earnings_growth_rate.unwrap_or(0.0)).clamp(0.5, 2.0);
    let fair_pe = industry_pe * quality_pe_multiple(quality) * growth_multiple;
    let base = eps * fair_pe;

    let confidence = if quality >= 50.0 {
        ValueConfidence::Medium
    } else {
        ValueConfidence::Low
    };

    Some(
        ValuationRange::new(ValuationMethod::Earnings, base * 0.7, base, base * 1.3, confidence)
            .with_assumption(format!("Fair P/E {:.1} on EPS ${:.2}", fair_pe, eps)),
    )
}

fn roe_book_multiple(roe: Option<f64>) -> f64 {
    match roe {
        Some(roe) if roe >= 0.20 => 3.0,
        Some(roe) if roe >= 0.15 => 2.0,
        Some(roe) if roe >= 0.10 => 1.5,
        Some(roe) => (1.0 + roe * 5.0).max(0.5),
        None => 1.0,
    }
}

/// Book value per share times a return-on-equity multiple.
pub fn book_value_range(metrics: &MetricSet, quality: f64) -> Option<ValuationRange> {
    let bvps = metrics.book_value().filter(|b| *b > 0.0)?;
    let quality_adjustment = 0.7 + quality.clamp(0.0, 100.0) / 100.0 * 0.6;
    let multiple = roe_book_multiple(metrics.roe()) * quality_adjustment;
    let base = bvps * multiple;

    let confidence = if quality >= 60.0 {
        ValueConfidence::High
    } else {
        ValueConfidence::Medium
    };

    Some(
        ValuationRange::new(ValuationMethod::BookValue, base * 0.6, base, base * 1.4, confidence)
            .with_assumption(format!("{:.2}x book value of ${:.2}", multiple, bvps)),
    )
}

fn perpetuity(owner_earnings: f64, growth: f64, required_return: f64) -> f64 {
    if required_return > growth {
        owner_earnings * (1.0 + growth) / (required_return - growth)
    } else {
        owner_earnings * PERPETUITY_CAP_MULTIPLE
    }
}

/// Owner earnings per share capitalized as a growing perpetuity.
pub fn owner_earnings_range(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<ValuationRange> {
    let oe = metrics.owner_earnings_per_share().filter(|oe| *oe > 0.0)?;
    let g = assumptions.terminal_growth;
    let r = assumptions.required_return;

    let conservative = perpetuity(oe * 0.85, g * 0.6, r + 0.03);
    let base = perpetuity(oe, g, r);
    let optimistic_r = r - 0.02;
    let optimistic = perpetuity(oe * 1.15, (g * 1.3).min(optimistic_r - 0.01), optimistic_r);

    Some(
        ValuationRange::new(ValuationMethod::OwnerEarnings, conservative, base, optimistic, ValueConfidence::Medium)
            .with_assumption(format!("Owner earnings ${:.2}/share, required return {:.1}%", oe, r * 100.0)),
    )
}

/// What a PAD estimate was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadBasis {
    NetIncome,
    Dividends,
}

/// Present value of `years` of `average` compounding at `growth`, discounted at `rate`.
fn projected_present_value(average: f64, growth: f64, rate: f64, years: u32) -> f64 {
    (1..=years as i32)
        .map(|i| average * (1.0_f64 + growth).powi(i) / (1.0_f64 + rate).powi(i))
        .sum()
}

/// Average and mean growth of a history, if it has at least two periods and a positive average.
fn average_with_growth(history: &[f64]) -> Option<(f64, f64)> {
    if history.len() < 2 {
        return None;
    }
    let average = stats::mean(history);
    if average <= 0.0 {
        return None;
    }
    let growth = stats::mean(&stats::year_over_year(history)).clamp(-0.05, 0.25);
    Some((average, growth))
}

/// PAD per share from average net income.
pub fn pad_net_income_value(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<f64> {
    let shares = metrics.shares_outstanding.filter(|s| *s > 0.0)?;
    let (average, growth) = average_with_growth(&metrics.net_income_history)?;
    Some(projected_present_value(average, growth, assumptions.risk_free_rate, assumptions.dcf_years) / shares)
}

/// PAD per share from average dividends per share.
pub fn pad_dividend_value(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<f64> {
    let (average, growth) = average_with_growth(&metrics.dividend_history)?;
    Some(projected_present_value(average, growth, assumptions.risk_free_rate, assumptions.dcf_years))
}

/// Projected average discounted at the risk-free rate, as a per-share point estimate.
///
/// Banks are projected from dividends, falling back to net income when there is
/// no usable dividend record. Everything else uses net income.
pub fn pad_estimate(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<(f64, PadBasis)> {
    if metrics.is_bank() {
        if let Some(value) = pad_dividend_value(metrics, assumptions) {
            return Some((value, PadBasis::Dividends));
        }
    }
    pad_net_income_value(metrics, assumptions).map(|value| (value, PadBasis::NetIncome))
}

pub fn pad_value(metrics: &MetricSet, assumptions: &ValuationAssumptions) -> Option<f64> {
    pad_estimate(metrics, assumptions).map(|(value, _)| value)
}

/// PAD point estimate wrapped in a quality-dependent band.
pub fn pad_range(metrics: &MetricSet, quality: f64, assumptions: &ValuationAssumptions) -> Option<ValuationRange> {
    let (value, basis) = pad_estimate(metrics, assumptions)?;
    let (history, label) = match basis {
        PadBasis::NetIncome => (&metrics.net_income_history, "net income"),
        PadBasis::Dividends => (&metrics.dividend_history, "dividends"),
    };
    let confidence = if history.len() >= 5 {
        ValueConfidence::Medium
    } else {
        ValueConfidence::Low
    };
    let uncertainty = quality_uncertainty(quality);

    Some(
        ValuationRange::from_point(ValuationMethod::Pad, value, uncertainty, confidence).with_assumption(format!(
            "{} years of {}, ±{:.0}% band",
            history.len(),
            label,
            uncertainty * 100.0
        )),
    )
}
