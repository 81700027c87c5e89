use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::RecordError;
use crate::loose;

/// Price statistics over the report period, as produced by the historical
/// analysis agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub total_return_percent: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub volatility: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub average_volume: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub trend_direction: Option<String>,
}

/// Valuation snapshot. `dividend_yield` arrives in an inconsistent unit
/// (4.5 and 0.045 both mean 4.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalAnalysis {
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub forward_pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub peg_ratio: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub price_to_book: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub sma_20: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub sma_50: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub rsi: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub support_level: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub resistance_level: Option<f64>,
}

/// Performance relative to a benchmark index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub benchmark_ticker: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub outperformance_percent: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub beta: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub correlation: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub relative_strength: Option<String>,
}

/// Risk statistics. Only `historical_volatility` and `max_drawdown` are
/// checked; beta, sharpe and regime are advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub historical_volatility: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub beta: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub sharpe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub volatility_regime: Option<String>,
}

/// News article as reported by the news agent. `published_date` is kept as
/// the raw string; its format varies between agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub published_date: Option<String>,
}

/// Insider (Form 4 style) transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub transaction_type: Option<String>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub shares: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub transaction_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub price_analysis: Option<PriceAnalysis>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub fundamental_analysis: Option<FundamentalAnalysis>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub technical_analysis: Option<TechnicalAnalysis>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub market_comparison: Option<MarketComparison>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub metrics: Option<VolatilityMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsReport {
    #[serde(default, deserialize_with = "loose::deserialize_vec")]
    pub articles: Vec<Article>,
}

/// Aggregates the insider agent computes over its whole lookback, not just
/// the transactions it lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub total_buy_volume: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub total_sell_volume: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_f64")]
    pub net_insider_activity: Option<f64>,
    #[serde(default, deserialize_with = "loose::deserialize_vec")]
    pub key_insiders: Vec<String>,
    #[serde(default, deserialize_with = "loose::deserialize_string")]
    pub activity_trend: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsiderReport {
    #[serde(default, deserialize_with = "loose::deserialize_vec")]
    pub recent_transactions: Vec<InsiderTransaction>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub activity_summary: Option<ActivitySummary>,
}

/// Everything the agents returned for one ticker. `ticker` is the only
/// required field; a numeric symbol is accepted as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerBundle {
    #[serde(deserialize_with = "loose::deserialize_text")]
    pub ticker: String,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub historical: Option<HistoricalReport>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub volatility: Option<VolatilityReport>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub news: Option<NewsReport>,
    #[serde(default, deserialize_with = "loose::deserialize_record")]
    pub insider: Option<InsiderReport>,
}

impl TickerBundle {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse either a single bundle object or an array of bundles.
    ///
    /// Array elements that are not usable bundles (no ticker, not an
    /// object) are skipped with a warning so the rest of the batch survives.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, RecordError> {
        let value: Value = serde_json::from_str(json)?;
        let kind = match value {
            Value::Array(items) => return Ok(Self::from_items(items)),
            object @ Value::Object(_) => return Ok(vec![Self::from_value(object)?]),
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
        };
        Err(RecordError::UnexpectedShape(format!(
            "expected an object or array of ticker bundles, got {kind}"
        )))
    }

    fn from_value(value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::UnexpectedShape(e.to_string()))
    }

    fn from_items(items: Vec<Value>) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match Self::from_value(item) {
                Ok(bundle) => Some(bundle),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unusable ticker bundle");
                    None
                }
            })
            .collect()
    }
}
