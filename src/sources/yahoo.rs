//! Yahoo Finance chart API client.
//!
//! One request to the v8 chart endpoint returns both the daily history and
//! the regular-market quote fields, so a snapshot costs a single round trip.

use super::MarketDataProvider;
use crate::error::{AppError, Result};
use crate::types::{Bar, MarketSnapshot, Quote, Series};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    regular_market_price: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    range: String,
    interval: String,
}

impl YahooFinanceClient {
    /// Create a client fetching `range` of history at `interval` bars
    /// (e.g. "1y" and "1d").
    pub fn new(
        timeout: Duration,
        range: impl Into<String>,
        interval: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            range: range.into(),
            interval: interval.into(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/{}?range={}&interval={}&includePrePost=false",
            CHART_URL,
            normalize_yahoo_symbol(symbol),
            self.range,
            self.interval
        )
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let url = self.chart_url(symbol);
        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Unknown symbol {}", symbol)));
        }
        if !status.is_success() {
            return Err(AppError::Provider(format!("Yahoo API error: {}", status)));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(symbol, data)
    }
}

/// Turn a chart response into a snapshot.
///
/// Bars with a missing or non-positive close are skipped. Quote fields
/// absent from the meta block fall back to values derived from the bars.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<MarketSnapshot> {
    if let Some(error) = data.chart.error {
        let message = format!("{} - {}", error.code, error.description);
        return Err(if error.code.eq_ignore_ascii_case("Not Found") {
            AppError::NotFound(message)
        } else {
            AppError::Provider(message)
        });
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::NotFound(format!("No data for {}", symbol)))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Provider("No quote data in response".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
        values.get(i).copied().flatten()
    }

    let bars: Vec<Bar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            let close = at(&closes, i).filter(|c| *c > 0.0)?;
            Some(Bar {
                time: timestamp * 1000,
                open: at(&opens, i).unwrap_or(close),
                high: at(&highs, i).unwrap_or(close),
                low: at(&lows, i).unwrap_or(close),
                close,
                volume: at(&volumes, i).unwrap_or(0.0),
            })
        })
        .collect();

    let name = if result.meta.symbol.is_empty() {
        normalize_yahoo_symbol(symbol)
    } else {
        result.meta.symbol.clone()
    };
    let series = Series::new(name, bars);
    let derived = Quote::from_series(&series)
        .ok_or_else(|| AppError::NotFound(format!("No price history for {}", symbol)))?;

    let meta = result.meta;
    let quote = Quote {
        price: meta.regular_market_price.unwrap_or(derived.price),
        high: meta.regular_market_day_high.unwrap_or(derived.high),
        low: meta.regular_market_day_low.unwrap_or(derived.low),
        prev_close: meta
            .chart_previous_close
            .or(meta.previous_close)
            .unwrap_or(derived.prev_close),
        volume: meta.regular_market_volume.unwrap_or(derived.volume),
        high_52w: meta.fifty_two_week_high.unwrap_or(derived.high_52w),
        low_52w: meta.fifty_two_week_low.unwrap_or(derived.low_52w),
        ..derived
    };

    debug!(
        symbol = %quote.symbol,
        bars = series.len(),
        price = quote.price,
        "Parsed Yahoo chart"
    );

    Ok(MarketSnapshot { series, quote })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<MarketSnapshot> {
        let data: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("aapl", data)
    }

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "regularMarketPrice": 156.5,
                    "chartPreviousClose": 149.0,
                    "fiftyTwoWeekHigh": 199.6,
                    "fiftyTwoWeekLow": 124.2
                },
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": {
                    "quote": [{
                        "open": [150.0, null, 152.0],
                        "high": [155.0, 156.0, 157.0],
                        "low": [148.0, 149.0, 150.0],
                        "close": [153.0, null, 155.0],
                        "volume": [50000000, 51000000, 52000000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_normalize_yahoo_symbol() {
        assert_eq!(normalize_yahoo_symbol("aapl"), "AAPL");
        assert_eq!(normalize_yahoo_symbol("BRK.B"), "BRK-B");
        assert_eq!(normalize_yahoo_symbol(" brk-a "), "BRK-A");
    }

    #[test]
    fn test_parse_chart_skips_missing_closes() {
        let snapshot = parse(CHART).unwrap();
        assert_eq!(snapshot.series.symbol, "AAPL");
        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.series.bars[0].time, 1_700_000_000_000);
        assert_eq!(snapshot.series.closes(), vec![153.0, 155.0]);
        assert_eq!(snapshot.series.bars[1].volume, 52_000_000.0);
    }

    #[test]
    fn test_parse_chart_prefers_meta_quote() {
        let snapshot = parse(CHART).unwrap();
        let quote = snapshot.quote;
        assert_eq!(quote.price, 156.5);
        assert_eq!(quote.prev_close, 149.0);
        assert_eq!(quote.high_52w, 199.6);
        assert_eq!(quote.low_52w, 124.2);
        // not in meta, taken from the last bar
        assert_eq!(quote.high, 157.0);
        assert_eq!(quote.volume, 52_000_000.0);
    }

    #[test]
    fn test_parse_chart_api_error() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        assert!(matches!(parse(json), Err(AppError::NotFound(_))));

        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Bad Request", "description": "Invalid range"}
            }
        }"#;
        assert!(matches!(parse(json), Err(AppError::Provider(_))));
    }

    #[test]
    fn test_parse_chart_without_bars() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "ZZZZ"},
                    "indicators": {"quote": [{}]}
                }],
                "error": null
            }
        }"#;
        assert!(matches!(parse(json), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_yahoo_meta_minimal() {
        let meta: YahooMeta = serde_json::from_str(r#"{"symbol": "MSFT"}"#).unwrap();
        assert_eq!(meta.symbol, "MSFT");
        assert!(meta.regular_market_price.is_none());
        assert!(meta.fifty_two_week_low.is_none());
    }

    #[test]
    fn test_client_creation() {
        let client = YahooFinanceClient::new(Duration::from_secs(5), "1y", "1d").unwrap();
        assert_eq!(client.name(), "yahoo");
        assert!(client.chart_url("brk.b").contains("/BRK-B?range=1y&interval=1d"));
    }
}
