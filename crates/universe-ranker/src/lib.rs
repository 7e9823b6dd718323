//! Batch runs over a ticker universe: bounded concurrent per-ticker analysis,
//! then Magic Formula ranking and verdict-ordered picks.

pub mod filters;
pub mod magic_formula;
pub mod picks;
pub mod pipeline;
pub mod source;

pub use filters::UniverseFilter;
pub use magic_formula::MagicFormulaRank;
pub use picks::{compare_picks, order_picks, RankedPick};
pub use pipeline::{rank_universe, RankedUniverse, UniverseRanker};
pub use source::InMemoryMetrics;
