use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use analysis_core::StockAnalysisRecord;

use crate::magic_formula::MagicFormulaRank;

/// A record in its final place in the pick list. The record itself is never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPick {
    pub position: usize,
    pub magic_formula: Option<MagicFormulaRank>,
    pub record: StockAnalysisRecord,
}

/// Larger values first, missing values last.
fn descending_option(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Verdict priority, then quality (desc), then primary valuation score (desc), then ticker.
pub fn compare_picks(a: &StockAnalysisRecord, b: &StockAnalysisRecord) -> Ordering {
    a.verdict
        .priority()
        .cmp(&b.verdict.priority())
        .then_with(|| descending_option(a.quality_score, b.quality_score))
        .then_with(|| descending_option(a.primary_score(), b.primary_score()))
        .then_with(|| a.ticker.cmp(&b.ticker))
}

pub fn order_picks(
    mut records: Vec<StockAnalysisRecord>,
    ranks: &HashMap<String, MagicFormulaRank>,
) -> Vec<RankedPick> {
    records.sort_by(compare_picks);
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedPick {
            position: i + 1,
            magic_formula: ranks.get(&record.ticker).copied(),
            record,
        })
        .collect()
}
