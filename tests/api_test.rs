//! Integration tests for API endpoints, driven in-process against a stub
//! market data provider.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use quantboard::api::screener::{DailyPicksQuery, ScreenerQuery};
use quantboard::config::Config;
use quantboard::services::{AnalysisOptions, AnalysisService, Cache, SnapshotCache};
use quantboard::sources::MarketDataProvider;
use quantboard::types::{Bar, MarketSnapshot, Quote, Series};
use quantboard::{app, AppError, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct StubProvider;

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> quantboard::Result<MarketSnapshot> {
        let step = match symbol {
            "UP" | "AAPL" => 0.4,
            "DOWN" => -0.4,
            "TINY" => return Ok(snapshot(symbol, 5, 0.1)),
            _ => return Err(AppError::NotFound(format!("No data for {}", symbol))),
        };
        Ok(snapshot(symbol, 250, step))
    }
}

fn snapshot(symbol: &str, count: usize, step: f64) -> MarketSnapshot {
    let bars = (0..count)
        .map(|i| {
            let close = 150.0 + step * i as f64 + (i % 4) as f64 * 0.3;
            Bar {
                time: i as i64 * 86_400_000,
                open: close,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 2_000_000.0 + (i % 5) as f64 * 10_000.0,
            }
        })
        .collect();
    let series = Series::new(symbol, bars);
    let quote = Quote::from_series(&series).unwrap();
    MarketSnapshot { series, quote }
}

fn test_app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "SCREENER_SYMBOLS" => Some("UP,DOWN,AAPL".to_string()),
        _ => None,
    });
    let cache: Arc<SnapshotCache> =
        Arc::new(Cache::<Arc<MarketSnapshot>>::new(Duration::from_secs(60)));
    let analysis = AnalysisService::new(
        Arc::new(StubProvider),
        cache,
        AnalysisOptions::from(&config),
    );

    app(AppState {
        config: Arc::new(config),
        analysis: Arc::new(analysis),
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =========================================================================
// Health
// =========================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, body) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["watchlist"], 3);
}

// =========================================================================
// Analysis
// =========================================================================

#[tokio::test]
async fn test_analysis_endpoint_and_cache_flag() {
    let app = test_app();

    let (status, body) = get(&app, "/api/analysis/up").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "UP");
    assert_eq!(body["meta"]["cached"], false);
    assert!(body["data"]["aiScore"].as_u64().unwrap() <= 100);
    assert!(body["data"]["trend"]["direction"].is_string());

    let (_, body) = get(&app, "/api/analysis/UP?profile=daily_picks").await;
    assert_eq!(body["meta"]["cached"], true);
}

#[tokio::test]
async fn test_analysis_unknown_symbol() {
    let app = test_app();
    let (status, body) = get(&app, "/api/analysis/NOPE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("NOPE"));
}

#[tokio::test]
async fn test_analysis_bad_profile() {
    let app = test_app();
    let (status, _) = get(&app, "/api/analysis/UP?profile=moonshot").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlay_endpoint() {
    let app = test_app();
    let (status, body) = get(&app, "/api/analysis/down/overlay").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "DOWN");
    assert_eq!(body["data"]["time"].as_array().unwrap().len(), 250);
    assert_eq!(body["data"]["sma200"].as_array().unwrap().len(), 250);
}

#[tokio::test]
async fn test_detector_endpoints() {
    let app = test_app();

    let (status, body) = get(&app, "/api/analysis/UP/trend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["direction"], "UPTREND");

    let (status, body) = get(&app, "/api/analysis/UP/levels").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["support"].is_array());

    let (status, body) = get(&app, "/api/analysis/UP/predictions").await;
    assert_eq!(status, StatusCode::OK);
    let horizons: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["horizon"].as_u64().unwrap())
        .collect();
    assert_eq!(horizons, vec![7, 14, 30]);
}

#[tokio::test]
async fn test_short_history_has_no_predictions() {
    let app = test_app();
    let (status, body) = get(&app, "/api/analysis/TINY/predictions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

// =========================================================================
// Screener
// =========================================================================

#[tokio::test]
async fn test_screener_sorted_with_failures() {
    let app = test_app();
    let (status, body) = get(&app, "/api/screener?symbols=down,up,nope").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["requested"], 3);
    assert_eq!(body["data"]["failed"][0], "NOPE");

    let scores: Vec<u64> = body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["aiScore"].as_u64().unwrap())
        .collect();
    assert_eq!(scores.len(), 2);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_screener_defaults_to_watchlist() {
    let app = test_app();
    let (status, body) = get(&app, "/api/screener").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["requested"], 3);
}

#[tokio::test]
async fn test_screener_category_filter() {
    let app = test_app();
    let (status, body) = get(&app, "/api/screener?symbols=UP,DOWN&category=watchout").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["category"] == "watchout"));

    let (status, _) = get(&app, "/api/screener?category=lottery").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_daily_picks_endpoint() {
    let app = test_app();

    let (status, body) = get(&app, "/api/screener/daily-picks?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"]["results"].as_array().unwrap();
    assert!(results.len() <= 2);
    assert!(results.iter().all(|r| r["category"] == "daily"));

    let (status, _) = get(&app, "/api/screener/daily-picks?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Query parsing
// =========================================================================

#[test]
fn test_screener_query_parsing() {
    let query: ScreenerQuery =
        serde_urlencoded::from_str("symbols=AAPL,MSFT&category=momentum&profile=daily_picks")
            .unwrap();
    assert_eq!(query.symbols.as_deref(), Some("AAPL,MSFT"));
    assert_eq!(query.category.as_deref(), Some("momentum"));
    assert_eq!(query.profile.as_deref(), Some("daily_picks"));

    let empty: ScreenerQuery = serde_urlencoded::from_str("").unwrap();
    assert!(empty.symbols.is_none());
}

#[test]
fn test_daily_picks_query_parsing() {
    let query: DailyPicksQuery = serde_urlencoded::from_str("limit=7").unwrap();
    assert_eq!(query.limit, Some(7));
    assert!(serde_urlencoded::from_str::<DailyPicksQuery>("limit=many").is_err());
}
