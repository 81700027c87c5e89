use analysis_core::{
    ActivitySummary, Article, FundamentalAnalysis, InsiderTransaction, MarketComparison, PriceAnalysis, TechnicalAnalysis,
    TickerBundle, VolatilityMetrics,
};
use data_reliability::{
    check_price_analysis, check_volatility_metrics, filter_recent_articles, filter_recent_transactions_with,
    format_currency, format_integer, format_percent, format_percent_with, format_ratio, format_ratio_with,
    sanitize_dividend_yield, NOT_AVAILABLE,
};
use serde::Serialize;

use crate::config::ReportConfig;

/// Most articles / transactions shown per ticker.
const MAX_LISTED: usize = 3;

/// Longest article snippet, in characters, including the `...` marker.
const MAX_SNIPPET_CHARS: usize = 240;

/// Display-ready view of one ticker bundle. Blocks that failed their quality
/// checks are `None` with the reason in the matching `*_rejection` field.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTicker {
    pub ticker: String,
    pub as_of: String,
    pub price: Option<PriceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_rejection: Option<String>,
    pub fundamentals: Option<FundamentalSummary>,
    pub technicals: Option<TechnicalSummary>,
    pub market_comparison: Option<ComparisonSummary>,
    pub volatility: Option<VolatilitySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility_rejection: Option<String>,
    pub recent_article_count: usize,
    pub articles: Vec<ArticleSummary>,
    pub recent_transaction_count: usize,
    pub transactions: Vec<TransactionSummary>,
    pub insider_activity: Option<ActivityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceSummary {
    pub total_return: String,
    pub volatility: String,
    pub price_range: String,
    pub average_volume: String,
    pub trend_direction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundamentalSummary {
    pub pe_ratio: String,
    pub forward_pe_ratio: String,
    pub peg_ratio: String,
    pub price_to_book: String,
    pub dividend_yield: String,
    pub fifty_two_week_high: String,
    pub fifty_two_week_low: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicalSummary {
    pub sma_20: String,
    pub sma_50: String,
    pub rsi: String,
    pub support_level: String,
    pub resistance_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub benchmark: String,
    pub outperformance: String,
    pub beta: String,
    pub correlation: String,
    pub relative_strength: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolatilitySummary {
    pub historical_volatility: String,
    pub beta_label: String,
    pub beta: String,
    pub sharpe_ratio: String,
    pub max_drawdown: String,
    pub regime: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub source: String,
    pub published_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    pub name: String,
    pub title: String,
    pub transaction_type: String,
    pub shares: String,
    pub price: String,
    pub value: String,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub total_buy_volume: String,
    pub total_sell_volume: String,
    /// Only present when the agent reported a net figure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_insider_activity: Option<String>,
    pub key_insiders: String,
    pub activity_trend: String,
}

fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Trimmed article body, cut to `MAX_SNIPPET_CHARS` with a trailing `...`.
/// Blank content has no snippet.
fn snippet(content: Option<&str>) -> Option<String> {
    let body = content.map(str::trim).filter(|s| !s.is_empty())?;
    if body.chars().count() <= MAX_SNIPPET_CHARS {
        return Some(body.to_string());
    }
    let cut: String = body.chars().take(MAX_SNIPPET_CHARS - 3).collect();
    Some(format!("{}...", cut.trim_end()))
}

fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_bundle(bundle: &TickerBundle, config: &ReportConfig) -> NormalizedTicker {
    let historical = bundle.historical.as_ref();
    let price_analysis = historical.and_then(|h| h.price_analysis.as_ref());

    let (price, price_rejection) = match check_price_analysis(price_analysis) {
        Ok(()) => (price_analysis.map(summarize_price), None),
        Err(reason) => {
            tracing::debug!(ticker = %bundle.ticker, %reason, "price analysis hidden");
            (None, Some(reason.to_string()))
        }
    };

    let metrics = bundle.volatility.as_ref().and_then(|v| v.metrics.as_ref());
    let (volatility, volatility_rejection) = match check_volatility_metrics(metrics) {
        Ok(()) => (metrics.map(|m| summarize_volatility(m, &config.benchmark)), None),
        Err(reason) => {
            tracing::debug!(ticker = %bundle.ticker, %reason, "volatility metrics hidden");
            (None, Some(reason.to_string()))
        }
    };

    let articles: &[Article] = bundle.news.as_ref().map(|n| n.articles.as_slice()).unwrap_or_default();
    let recent_articles = filter_recent_articles(articles, config.as_of, config.article_max_age_days);

    let transactions: &[InsiderTransaction] = bundle
        .insider
        .as_ref()
        .map(|i| i.recent_transactions.as_slice())
        .unwrap_or_default();
    let recent_transactions = filter_recent_transactions_with(
        transactions,
        config.as_of,
        config.transaction_max_age_days,
        &config.placeholders,
    );

    tracing::info!(
        ticker = %bundle.ticker,
        price_ok = price.is_some(),
        volatility_ok = volatility.is_some(),
        recent_articles = recent_articles.len(),
        total_articles = articles.len(),
        recent_transactions = recent_transactions.len(),
        total_transactions = transactions.len(),
        "normalized ticker bundle"
    );

    NormalizedTicker {
        ticker: bundle.ticker.clone(),
        as_of: config.as_of.to_string(),
        price,
        price_rejection,
        fundamentals: historical
            .and_then(|h| h.fundamental_analysis.as_ref())
            .map(summarize_fundamentals),
        technicals: historical
            .and_then(|h| h.technical_analysis.as_ref())
            .map(summarize_technicals),
        market_comparison: historical
            .and_then(|h| h.market_comparison.as_ref())
            .map(summarize_comparison),
        volatility,
        volatility_rejection,
        recent_article_count: recent_articles.len(),
        articles: recent_articles.iter().take(MAX_LISTED).map(summarize_article).collect(),
        recent_transaction_count: recent_transactions.len(),
        transactions: recent_transactions
            .iter()
            .take(MAX_LISTED)
            .map(summarize_transaction)
            .collect(),
        insider_activity: bundle
            .insider
            .as_ref()
            .and_then(|i| i.activity_summary.as_ref())
            .map(summarize_activity),
    }
}

fn summarize_price(pa: &PriceAnalysis) -> PriceSummary {
    PriceSummary {
        total_return: format_percent(pa.total_return_percent),
        volatility: format_percent(pa.volatility),
        price_range: format!("{} - {}", format_currency(pa.min_price), format_currency(pa.max_price)),
        average_volume: format_integer(pa.average_volume),
        trend_direction: pa
            .trend_direction
            .as_deref()
            .map(title_case)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn summarize_fundamentals(fa: &FundamentalAnalysis) -> FundamentalSummary {
    let dividend_yield = match sanitize_dividend_yield(fa.dividend_yield) {
        Some(fraction) => format_percent_with(Some(fraction), 2, true),
        None => NOT_AVAILABLE.to_string(),
    };
    FundamentalSummary {
        pe_ratio: format_ratio(fa.pe_ratio),
        forward_pe_ratio: format_ratio(fa.forward_pe_ratio),
        peg_ratio: format_ratio(fa.peg_ratio),
        price_to_book: format_ratio(fa.price_to_book),
        dividend_yield,
        fifty_two_week_high: format_currency(fa.fifty_two_week_high),
        fifty_two_week_low: format_currency(fa.fifty_two_week_low),
    }
}

fn summarize_technicals(ta: &TechnicalAnalysis) -> TechnicalSummary {
    TechnicalSummary {
        sma_20: format_currency(ta.sma_20),
        sma_50: format_currency(ta.sma_50),
        rsi: format_ratio(ta.rsi),
        support_level: format_currency(ta.support_level),
        resistance_level: format_currency(ta.resistance_level),
    }
}

fn summarize_comparison(mc: &MarketComparison) -> ComparisonSummary {
    ComparisonSummary {
        benchmark: text(mc.benchmark_ticker.as_deref()),
        outperformance: format_percent(mc.outperformance_percent),
        beta: format_ratio(mc.beta),
        correlation: format_ratio_with(mc.correlation, 4),
        relative_strength: text(mc.relative_strength.as_deref()),
    }
}

fn summarize_volatility(m: &VolatilityMetrics, benchmark: &str) -> VolatilitySummary {
    VolatilitySummary {
        historical_volatility: format_percent(m.historical_volatility),
        beta_label: format!("Beta vs {benchmark}"),
        beta: format_ratio(m.beta),
        sharpe_ratio: format_ratio(m.sharpe_ratio),
        max_drawdown: format_percent(m.max_drawdown),
        regime: text(m.volatility_regime.as_deref()),
    }
}

fn summarize_article(article: &Article) -> ArticleSummary {
    ArticleSummary {
        title: text(article.title.as_deref()),
        source: text(article.source.as_deref()),
        published_date: text(article.published_date.as_deref()),
        content: snippet(article.content.as_deref()),
    }
}

fn summarize_transaction(txn: &InsiderTransaction) -> TransactionSummary {
    TransactionSummary {
        name: text(txn.name.as_deref()),
        title: text(txn.title.as_deref()),
        transaction_type: text(txn.transaction_type.as_deref()),
        shares: format_integer(txn.shares),
        price: format_currency(txn.price),
        value: format_currency(txn.value),
        transaction_date: text(txn.transaction_date.as_deref()),
    }
}

fn summarize_activity(summary: &ActivitySummary) -> ActivityView {
    let insiders: Vec<&str> = summary
        .key_insiders
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    ActivityView {
        total_buy_volume: format_integer(summary.total_buy_volume),
        total_sell_volume: format_integer(summary.total_sell_volume),
        net_insider_activity: summary.net_insider_activity.map(|net| format_currency(Some(net))),
        key_insiders: if insiders.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            insiders.join(", ")
        },
        activity_trend: text(summary.activity_trend.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_reliability::PlaceholderNames;

    fn config() -> ReportConfig {
        ReportConfig {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            article_max_age_days: 120,
            transaction_max_age_days: 365,
            placeholders: PlaceholderNames::default(),
            benchmark: "SPY".to_string(),
        }
    }

    fn bundle() -> TickerBundle {
        TickerBundle::from_json(
            r#"{
                "ticker": "AAPL",
                "historical": {
                    "price_analysis": {
                        "total_return_percent": 15, "volatility": 20,
                        "min_price": 100, "max_price": 200,
                        "average_volume": 1000, "trend_direction": "strongly upward"
                    },
                    "fundamental_analysis": {"pe_ratio": 28.456, "dividend_yield": 4.5, "fifty_two_week_high": 1234.5},
                    "market_comparison": {"benchmark_ticker": "SPY", "correlation": 0.87654}
                },
                "volatility": {"metrics": {"historical_volatility": 28.5, "max_drawdown": 12.0}},
                "news": {"articles": [
                    {"title": "a", "published_date": "2024-05-01"},
                    {"title": "b", "published_date": "2024-05-02"},
                    {"title": "c", "published_date": "2024-05-03"},
                    {"title": "d", "published_date": "2024-05-04"},
                    {"title": "stale", "published_date": "2023-01-01"}
                ]},
                "insider": {
                    "recent_transactions": [
                        {"name": "John Doe", "transaction_date": "2024-05-01"},
                        {"name": "Maria Chen", "shares": 1200.4, "price": 187.5, "transaction_date": "2024-05-01"}
                    ],
                    "activity_summary": {
                        "total_buy_volume": 12500.6, "total_sell_volume": "48000",
                        "net_insider_activity": -2500, "key_insiders": ["Maria Chen", " ", "Luca Rossi"],
                        "activity_trend": "Net selling"
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_full_bundle() {
        let n = normalize_bundle(&bundle(), &config());

        let price = n.price.unwrap();
        assert_eq!(price.total_return, "15.00%");
        assert_eq!(price.price_range, "$100.00 - $200.00");
        assert_eq!(price.average_volume, "1,000");
        assert_eq!(price.trend_direction, "Strongly Upward");
        assert!(n.price_rejection.is_none());

        let fundamentals = n.fundamentals.unwrap();
        assert_eq!(fundamentals.pe_ratio, "28.46");
        assert_eq!(fundamentals.dividend_yield, "4.50%");
        assert_eq!(fundamentals.fifty_two_week_high, "$1,234.50");
        assert_eq!(fundamentals.peg_ratio, "N/A");

        assert_eq!(n.market_comparison.unwrap().correlation, "0.8765");
        assert!(n.technicals.is_none());
    }

    #[test]
    fn test_positive_drawdown_hides_volatility() {
        let n = normalize_bundle(&bundle(), &config());
        assert!(n.volatility.is_none());
        assert!(n.volatility_rejection.unwrap().contains("max_drawdown"));
    }

    #[test]
    fn test_lists_are_filtered_and_capped() {
        let n = normalize_bundle(&bundle(), &config());
        assert_eq!(n.recent_article_count, 4);
        let titles: Vec<_> = n.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        assert_eq!(n.recent_transaction_count, 1);
        assert_eq!(n.transactions[0].name, "Maria Chen");
        assert_eq!(n.transactions[0].shares, "1,200");
        assert_eq!(n.transactions[0].title, "N/A");
    }

    #[test]
    fn test_empty_bundle_degrades_to_sentinels() {
        let n = normalize_bundle(&TickerBundle::from_json(r#"{"ticker": "XYZ"}"#).unwrap(), &config());
        assert!(n.price.is_none());
        assert_eq!(n.price_rejection.as_deref(), Some("record missing"));
        assert!(n.volatility.is_none());
        assert!(n.articles.is_empty());
        assert!(n.transactions.is_empty());
    }

    #[test]
    fn test_activity_summary_is_formatted() {
        let activity = normalize_bundle(&bundle(), &config()).insider_activity.unwrap();
        assert_eq!(activity.total_buy_volume, "12,501");
        assert_eq!(activity.total_sell_volume, "48,000");
        assert_eq!(activity.net_insider_activity.as_deref(), Some("$-2,500.00"));
        assert_eq!(activity.key_insiders, "Maria Chen, Luca Rossi");
        assert_eq!(activity.activity_trend, "Net selling");
    }

    #[test]
    fn test_activity_summary_with_absent_values() {
        let bundle = TickerBundle::from_json(
            r#"{"ticker": "XYZ", "insider": {"activity_summary": {"total_sell_volume": "N/A", "key_insiders": "nobody"}}}"#,
        )
        .unwrap();
        let n = normalize_bundle(&bundle, &config());

        let activity = n.insider_activity.as_ref().unwrap();
        assert_eq!(activity.total_buy_volume, "N/A");
        assert_eq!(activity.total_sell_volume, "N/A");
        assert!(activity.net_insider_activity.is_none());
        assert_eq!(activity.key_insiders, "N/A");
        assert_eq!(activity.activity_trend, "N/A");

        let json = serde_json::to_value(&n).unwrap();
        assert!(json["insider_activity"].get("net_insider_activity").is_none());
    }

    #[test]
    fn test_missing_activity_summary_is_none() {
        let n = normalize_bundle(&TickerBundle::from_json(r#"{"ticker": "XYZ", "insider": {}}"#).unwrap(), &config());
        assert!(n.insider_activity.is_none());
    }

    #[test]
    fn test_snippet_truncation() {
        let exact = "x".repeat(240);
        assert_eq!(snippet(Some(&exact)).as_deref(), Some(exact.as_str()));

        let long = "y".repeat(241);
        let cut = snippet(Some(&long)).unwrap();
        assert_eq!(cut, format!("{}...", "y".repeat(237)));
        assert_eq!(cut.chars().count(), 240);

        // whitespace at the cut point is dropped before the marker
        let spaced = format!("{}   {}", "a".repeat(235), "b".repeat(10));
        assert_eq!(snippet(Some(&spaced)).unwrap(), format!("{}...", "a".repeat(235)));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let accented = "é".repeat(241);
        assert_eq!(snippet(Some(&accented)).unwrap(), format!("{}...", "é".repeat(237)));
        assert_eq!(snippet(Some("  padded  ")).as_deref(), Some("padded"));
        assert_eq!(snippet(Some("   ")), None);
        assert_eq!(snippet(None), None);
    }

    #[test]
    fn test_article_content_snippet_in_view() {
        let bundle = TickerBundle::from_json(&format!(
            r#"{{"ticker": "AAPL", "news": {{"articles": [
                {{"title": "long", "content": "{}", "published_date": "2024-05-01"}},
                {{"title": "none", "published_date": "2024-05-01"}}
            ]}}}}"#,
            "z".repeat(300)
        ))
        .unwrap();
        let n = normalize_bundle(&bundle, &config());
        assert_eq!(n.articles[0].content.as_deref().map(|c| c.chars().count()), Some(240));
        assert!(n.articles[1].content.is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("UPWARD"), "Upward");
        assert_eq!(title_case("  sideways  drift "), "Sideways Drift");
        assert_eq!(title_case(""), "");
    }
}
