use std::io::Read;

use analysis_core::TickerBundle;
use anyhow::{Context, Result};
use rayon::prelude::*;

mod config;
mod normalize;

use config::ReportConfig;
use normalize::{normalize_bundle, NormalizedTicker};

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr; stdout carries the normalized JSON.
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read ticker bundles from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage:");
        eprintln!("  report-check [FILE]    Normalize agent ticker bundles (JSON object or array)");
        eprintln!("                         Reads stdin when FILE is omitted or '-'");
        eprintln!("  --compact              Print compact instead of pretty JSON");
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  REPORT_AS_OF_DATE         Report date (YYYY-MM-DD), default today");
        eprintln!("  ARTICLE_MAX_AGE_DAYS      News recency window (default 120)");
        eprintln!("  TRANSACTION_MAX_AGE_DAYS  Insider recency window (default 365)");
        eprintln!("  EXTRA_PLACEHOLDER_NAMES   Comma-separated names to treat as fabricated");
        eprintln!("  REPORT_BENCHMARK          Benchmark label for beta (default SPY)");
        return Ok(());
    }
    let compact = args.iter().any(|a| a == "--compact");
    let path = args.iter().skip(1).find(|a| !a.starts_with("--")).map(String::as_str);

    let config = ReportConfig::from_env()?;
    tracing::info!(
        as_of = %config.as_of,
        article_window_days = config.article_max_age_days,
        transaction_window_days = config.transaction_max_age_days,
        placeholder_names = config.placeholders.len(),
        "Configuration loaded"
    );

    let raw = read_input(path)?;
    let bundles = TickerBundle::list_from_json(&raw).context("failed to parse ticker bundles")?;
    tracing::info!("Normalizing {} ticker bundle(s)", bundles.len());

    let normalized: Vec<NormalizedTicker> = bundles
        .par_iter()
        .map(|bundle| normalize_bundle(bundle, &config))
        .collect();

    let hidden = normalized
        .iter()
        .filter(|n| n.price.is_none() || n.volatility.is_none())
        .count();
    if hidden > 0 {
        tracing::warn!("{} of {} tickers had blocks hidden by quality checks", hidden, normalized.len());
    }

    let output = if compact {
        serde_json::to_string(&normalized)?
    } else {
        serde_json::to_string_pretty(&normalized)?
    };
    println!("{output}");

    Ok(())
}
