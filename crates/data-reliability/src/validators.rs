//! Hard plausibility bounds for agent-produced analysis blocks.
//!
//! These are market limits, not outlier detection: no equity realistically
//! returns more than ±400% in a year or shows 200% realized volatility in a
//! sane price-analysis block. A record that breaks any bound is hidden whole.

use analysis_core::{PriceAnalysis, VolatilityMetrics};
use thiserror::Error;
use tracing::debug;

const MAX_ABS_TOTAL_RETURN_PERCENT: f64 = 400.0;
const MAX_PRICE_VOLATILITY_PERCENT: f64 = 200.0;
const MAX_HISTORICAL_VOLATILITY_PERCENT: f64 = 250.0;
const MIN_MAX_DRAWDOWN_PERCENT: f64 = -100.0;

/// First rule a record failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("record missing")]
    MissingRecord,

    #[error("{0} missing")]
    MissingField(&'static str),

    #[error("{field} = {value} is outside the plausible range")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("min_price {min} is not below max_price {max}")]
    InvertedPriceRange { min: f64, max: f64 },
}

fn require(value: Option<f64>, field: &'static str) -> Result<f64, Rejection> {
    value.ok_or(Rejection::MissingField(field))
}

fn bounded(
    value: Option<f64>,
    field: &'static str,
    accept: impl Fn(f64) -> bool,
) -> Result<f64, Rejection> {
    let v = require(value, field)?;
    // NaN fails every comparison, so it lands here too
    if accept(v) {
        Ok(v)
    } else {
        Err(Rejection::OutOfRange { field, value: v })
    }
}

/// Check a price-analysis block, returning the first failed rule.
pub fn check_price_analysis(record: Option<&PriceAnalysis>) -> Result<(), Rejection> {
    let pa = record.ok_or(Rejection::MissingRecord)?;

    bounded(pa.total_return_percent, "total_return_percent", |v| {
        v.abs() <= MAX_ABS_TOTAL_RETURN_PERCENT
    })?;
    bounded(pa.volatility, "volatility", |v| {
        (0.0..=MAX_PRICE_VOLATILITY_PERCENT).contains(&v)
    })?;

    let min = require(pa.min_price, "min_price")?;
    let max = require(pa.max_price, "max_price")?;
    bounded(Some(min), "min_price", |v| v > 0.0)?;
    bounded(Some(max), "max_price", |v| v > 0.0)?;
    if min >= max {
        return Err(Rejection::InvertedPriceRange { min, max });
    }

    bounded(pa.average_volume, "average_volume", |v| v > 0.0)?;
    Ok(())
}

/// Check a volatility-metrics block. Only historical volatility and max
/// drawdown are bounded; beta, sharpe and regime are advisory.
pub fn check_volatility_metrics(record: Option<&VolatilityMetrics>) -> Result<(), Rejection> {
    let metrics = record.ok_or(Rejection::MissingRecord)?;

    bounded(metrics.historical_volatility, "historical_volatility", |v| {
        (0.0..=MAX_HISTORICAL_VOLATILITY_PERCENT).contains(&v)
    })?;
    bounded(metrics.max_drawdown, "max_drawdown", |v| {
        (MIN_MAX_DRAWDOWN_PERCENT..=0.0).contains(&v)
    })?;
    Ok(())
}

pub fn is_price_analysis_reliable(record: Option<&PriceAnalysis>) -> bool {
    verdict("price_analysis", check_price_analysis(record))
}

pub fn is_valid_volatility_metrics(record: Option<&VolatilityMetrics>) -> bool {
    verdict("volatility_metrics", check_volatility_metrics(record))
}

fn verdict(kind: &'static str, outcome: Result<(), Rejection>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(reason) => {
            debug!(record = kind, %reason, "record failed quality checks");
            false
        }
    }
}
