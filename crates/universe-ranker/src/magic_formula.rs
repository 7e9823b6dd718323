use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use analysis_core::StockAnalysisRecord;

/// A ticker's place in the Magic Formula ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagicFormulaRank {
    pub earnings_yield_rank: usize,
    pub return_on_capital_rank: usize,
    /// Sum of the two ranks; lower is better
    pub combined_rank: usize,
    /// 1-based position once ordered by combined rank
    pub position: usize,
    /// (N - position + 1) / N * 100
    pub percentile: f64,
}

/// Ranks 1..N by `value` descending, ties broken by ticker.
fn rank_descending(entries: &[(&str, f64)]) -> HashMap<String, usize> {
    let mut sorted: Vec<&(&str, f64)> = entries.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
        .iter()
        .enumerate()
        .map(|(i, (ticker, _))| (ticker.to_string(), i + 1))
        .collect()
}

/// Cross-sectional Magic Formula ranks.
///
/// Only tickers with a positive earnings yield and a positive return on capital
/// take part; the rest get no rank. The result depends only on the set of
/// records, not on their input order.
pub fn rank(records: &[StockAnalysisRecord]) -> HashMap<String, MagicFormulaRank> {
    let eligible: Vec<(&str, f64, f64)> = records
        .iter()
        .filter_map(|r| match (r.earnings_yield, r.return_on_capital) {
            (Some(ey), Some(roc)) if ey > 0.0 && roc > 0.0 => Some((r.ticker.as_str(), ey, roc)),
            _ => None,
        })
        .collect();

    let n = eligible.len();
    if n == 0 {
        return HashMap::new();
    }

    let ey_ranks = rank_descending(&eligible.iter().map(|(t, ey, _)| (*t, *ey)).collect::<Vec<_>>());
    let roc_ranks = rank_descending(&eligible.iter().map(|(t, _, roc)| (*t, *roc)).collect::<Vec<_>>());

    let mut combined: Vec<(&str, usize, usize)> = eligible
        .iter()
        .map(|(t, _, _)| {
            let ey = ey_ranks.get(*t).copied().unwrap_or(n);
            let roc = roc_ranks.get(*t).copied().unwrap_or(n);
            (*t, ey, roc)
        })
        .collect();
    combined.sort_by(|a, b| match (a.1 + a.2).cmp(&(b.1 + b.2)) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });

    combined
        .into_iter()
        .enumerate()
        .map(|(i, (ticker, ey, roc))| {
            let position = i + 1;
            (
                ticker.to_string(),
                MagicFormulaRank {
                    earnings_yield_rank: ey,
                    return_on_capital_rank: roc,
                    combined_rank: ey + roc,
                    position,
                    percentile: (n - position + 1) as f64 / n as f64 * 100.0,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn create_test_record(ticker: &str, ey: Option<f64>, roc: Option<f64>) -> StockAnalysisRecord {
        let mut record = StockAnalysisRecord::insufficient_data(
            ticker,
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            "test",
        );
        record.earnings_yield = ey;
        record.return_on_capital = roc;
        record
    }

    #[test]
    fn test_combined_rank() {
        let records = vec![
            create_test_record("AAA", Some(0.10), Some(0.30)),
            create_test_record("BBB", Some(0.15), Some(0.20)),
            create_test_record("CCC", Some(0.05), Some(0.10)),
        ];
        let ranks = rank(&records);

        // AAA: EY 2 + ROC 1 = 3, BBB: 1 + 2 = 3, CCC: 3 + 3 = 6
        assert_eq!(ranks["AAA"].combined_rank, 3);
        assert_eq!(ranks["BBB"].combined_rank, 3);
        assert_eq!(ranks["AAA"].position, 1);
        assert_eq!(ranks["BBB"].position, 2);
        assert_eq!(ranks["CCC"].position, 3);
        assert_relative_eq!(ranks["AAA"].percentile, 100.0);
        assert_relative_eq!(ranks["CCC"].percentile, 100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ineligible_tickers_are_unranked() {
        let records = vec![
            create_test_record("GOOD", Some(0.10), Some(0.20)),
            create_test_record("NEG", Some(-0.05), Some(0.40)),
            create_test_record("NONE", None, Some(0.40)),
        ];
        let ranks = rank(&records);
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks["GOOD"].combined_rank, 2);
    }

    #[test]
    fn test_rank_is_order_independent() {
        let mut records = vec![
            create_test_record("ZED", Some(0.12), Some(0.12)),
            create_test_record("ABC", Some(0.12), Some(0.12)),
            create_test_record("MID", Some(0.08), Some(0.25)),
        ];
        let forward = rank(&records);
        records.reverse();
        let backward = rank(&records);
        assert_eq!(forward, backward);
        // Identical metrics: ticker order decides
        assert!(forward["ABC"].earnings_yield_rank < forward["ZED"].earnings_yield_rank);
    }
}
