use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use data_reliability::{PlaceholderNames, DEFAULT_ARTICLE_MAX_AGE_DAYS, DEFAULT_TRANSACTION_MAX_AGE_DAYS};
use std::env;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub as_of: NaiveDate,
    pub article_max_age_days: i64,      // 120
    pub transaction_max_age_days: i64,  // 365
    pub placeholders: PlaceholderNames, // built-ins + EXTRA_PLACEHOLDER_NAMES
    pub benchmark: String,              // SPY
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        let today = chrono::Local::now().date_naive();
        Self::from_lookup(|key| env::var(key).ok(), today)
    }

    /// Build the config from an arbitrary key lookup. `today` is the fallback
    /// report date when `REPORT_AS_OF_DATE` is unset or invalid.
    pub fn from_lookup<F>(lookup: F, today: NaiveDate) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let as_of = match lookup("REPORT_AS_OF_DATE").filter(|v| !v.trim().is_empty()) {
            Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    tracing::warn!(
                        "REPORT_AS_OF_DATE '{}' is invalid; using today's date ({}) instead",
                        raw,
                        today
                    );
                    today
                }
            },
            None => today,
        };

        let article_max_age_days = parse_days(&lookup, "ARTICLE_MAX_AGE_DAYS", DEFAULT_ARTICLE_MAX_AGE_DAYS)?;
        let transaction_max_age_days =
            parse_days(&lookup, "TRANSACTION_MAX_AGE_DAYS", DEFAULT_TRANSACTION_MAX_AGE_DAYS)?;

        let placeholders = match lookup("EXTRA_PLACEHOLDER_NAMES") {
            Some(extra) => PlaceholderNames::with_extra(extra.split(',')),
            None => PlaceholderNames::default(),
        };

        let benchmark = lookup("REPORT_BENCHMARK")
            .map(|b| b.trim().to_uppercase())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "SPY".to_string());

        Ok(Self {
            as_of,
            article_max_age_days,
            transaction_max_age_days,
            placeholders,
            benchmark,
        })
    }
}

fn parse_days<F>(lookup: &F, key: &str, default: i64) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let days: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of days, got '{raw}'"))?;
    ensure!(days >= 0, "{key} must not be negative, got {days}");
    Ok(days)
}
