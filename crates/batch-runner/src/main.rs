//! batch-runner: analyze a universe of tickers and print verdict-ordered picks.
//!
//! Reads a JSON array of metric sets, runs every ticker through the lenses,
//! valuation range and verdict matrix, ranks the universe and prints JSON.
//!
//! Usage:
//!   cargo run -p batch-runner -- --input universe.json
//!   cargo run -p batch-runner -- --input universe.json --style deep-value --top 25
//!   cargo run -p batch-runner -- --input universe.json --country US --min-confidence medium

mod config;

use analysis_core::{ConfidenceLevel, InvestmentStyle, WeightProfile};
use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use config::RunnerConfig;
use std::sync::Arc;
use universe_ranker::{InMemoryMetrics, UniverseFilter, UniverseRanker};

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// Comma-separated list flag, e.g. `--country US,CA`.
fn arg_list(args: &[String], flag: &str) -> Vec<String> {
    arg_value(args, flag)
        .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn parse_confidence(raw: &str) -> anyhow::Result<ConfidenceLevel> {
    match raw.to_ascii_lowercase().as_str() {
        "low" => Ok(ConfidenceLevel::Low),
        "medium" => Ok(ConfidenceLevel::Medium),
        "high" => Ok(ConfidenceLevel::High),
        other => bail!("unknown confidence level '{}'", other),
    }
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "batch_runner=info,universe_ranker=info".into())
    };
    // Logs go to stderr so stdout stays valid JSON.
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let pretty = args.iter().any(|a| a == "--pretty");

    let mut config = RunnerConfig::from_env()?;
    if let Some(style) = arg_value(&args, "--style") {
        let style: InvestmentStyle = style.parse()?;
        config.engine.weighting = WeightProfile::Preset(style);
    }
    if let Some(top) = arg_value(&args, "--top") {
        config.top_n = top.parse().context("--top")?;
    }
    if let Some(concurrency) = arg_value(&args, "--concurrency") {
        config.engine.concurrency = concurrency.parse().context("--concurrency")?;
    }
    config.validate()?;

    let input = match arg_value(&args, "--input") {
        Some(path) => path.to_string(),
        None => match config.input_path.clone() {
            Some(path) => path,
            None => bail!("no input: pass --input PATH or set MOSEE_INPUT"),
        },
    };

    let as_of = match arg_value(&args, "--date") {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d").context("--date must be YYYY-MM-DD")?,
        None => Utc::now().date_naive(),
    };

    let filter = UniverseFilter {
        countries: arg_list(&args, "--country"),
        exclude_countries: arg_list(&args, "--exclude-country"),
        cap_sizes: arg_list(&args, "--cap-size"),
        industries: arg_list(&args, "--industry"),
        exclude_industries: arg_list(&args, "--exclude-industry"),
        min_confidence: arg_value(&args, "--min-confidence").map(parse_confidence).transpose()?,
    };

    let source = Arc::new(InMemoryMetrics::from_json_file(&input)?);
    tracing::info!("Loaded {} metric sets from {}", source.len(), input);

    let ranker = UniverseRanker::from_config(&config.engine)?;
    let ranked = ranker.run(source, as_of).await?;

    let mut picks = ranked.filtered(&filter);
    if !filter.is_empty() {
        tracing::info!("{} of {} picks pass filters", picks.len(), ranked.picks.len());
    }
    if config.top_n > 0 {
        picks.truncate(config.top_n);
    }

    let output = serde_json::json!({
        "analysis_date": ranked.analysis_date,
        "total_analyzed": ranked.total_analyzed,
        "insufficient_data": ranked.insufficient_data,
        "picks": picks,
    });
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}
