use analysis_core::{Article, InsiderTransaction};
use chrono::NaiveDate;
use tracing::trace;

use crate::dates::parse_record_date;
use crate::placeholders::PlaceholderNames;

pub const DEFAULT_ARTICLE_MAX_AGE_DAYS: i64 = 120;
pub const DEFAULT_TRANSACTION_MAX_AGE_DAYS: i64 = 365;

/// A record carrying a raw, agent-formatted date string.
pub trait Timestamped {
    fn raw_date(&self) -> Option<&str>;
}

impl Timestamped for Article {
    fn raw_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }
}

impl Timestamped for InsiderTransaction {
    fn raw_date(&self) -> Option<&str> {
        self.transaction_date.as_deref()
    }
}

/// Records dated no more than `max_age_days` before `as_of` are recent.
/// The boundary day is included and future-dated records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    pub as_of: NaiveDate,
    pub max_age_days: i64,
}

impl RecencyWindow {
    pub fn new(as_of: NaiveDate, max_age_days: i64) -> Self {
        Self { as_of, max_age_days }
    }

    pub fn articles(as_of: NaiveDate) -> Self {
        Self::new(as_of, DEFAULT_ARTICLE_MAX_AGE_DAYS)
    }

    pub fn transactions(as_of: NaiveDate) -> Self {
        Self::new(as_of, DEFAULT_TRANSACTION_MAX_AGE_DAYS)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.as_of - date).num_days() <= self.max_age_days
    }

    /// Undated or unparseable records are never recent.
    pub fn admits<T: Timestamped>(&self, record: &T) -> bool {
        match record.raw_date().and_then(parse_record_date) {
            Some(date) => self.contains(date),
            None => {
                trace!(raw_date = ?record.raw_date(), "dropping undated record");
                false
            }
        }
    }

    /// Keep the records inside the window, preserving input order.
    pub fn filter<T: Timestamped + Clone>(&self, records: &[T]) -> Vec<T> {
        records.iter().filter(|r| self.admits(*r)).cloned().collect()
    }
}

pub fn filter_recent_articles(articles: &[Article], as_of: NaiveDate, max_age_days: i64) -> Vec<Article> {
    RecencyWindow::new(as_of, max_age_days).filter(articles)
}

/// Drop transactions attributed to a blank or placeholder insider name.
pub fn filter_valid_transactions(transactions: &[InsiderTransaction]) -> Vec<InsiderTransaction> {
    filter_valid_transactions_with(transactions, &PlaceholderNames::default())
}

pub fn filter_valid_transactions_with(
    transactions: &[InsiderTransaction],
    placeholders: &PlaceholderNames,
) -> Vec<InsiderTransaction> {
    transactions
        .iter()
        .filter(|txn| !placeholders.rejects(txn.name.as_deref().unwrap_or_default()))
        .cloned()
        .collect()
}

/// Valid transactions within `max_age_days` of `as_of`.
pub fn filter_recent_transactions(
    transactions: &[InsiderTransaction],
    as_of: NaiveDate,
    max_age_days: i64,
) -> Vec<InsiderTransaction> {
    filter_recent_transactions_with(transactions, as_of, max_age_days, &PlaceholderNames::default())
}

pub fn filter_recent_transactions_with(
    transactions: &[InsiderTransaction],
    as_of: NaiveDate,
    max_age_days: i64,
    placeholders: &PlaceholderNames,
) -> Vec<InsiderTransaction> {
    let valid = filter_valid_transactions_with(transactions, placeholders);
    RecencyWindow::new(as_of, max_age_days).filter(&valid)
}
