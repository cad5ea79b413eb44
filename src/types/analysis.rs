use serde::{Deserialize, Serialize};

use super::{Category, Horizon, Prediction, Rating, RiskLevel, TrendAssessment, LevelSet};

/// Flat per-symbol analysis summary consumed by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub price_change_5d: Option<f64>,
    pub price_change_20d: Option<f64>,
    /// Percent below the 52-week high.
    pub near_high_52w: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub ai_score: u8,
    pub rating: String,
    pub rating_class: String,
    pub rating_bucket: Rating,
    pub category: Category,
    pub horizon: String,
    pub horizon_thai: String,
    pub horizon_bucket: Horizon,
    pub recommendation: String,
    pub analysis: Vec<String>,
    pub entry_point: Option<f64>,
    pub exit_point: Option<f64>,
    pub risk_level: RiskLevel,
    pub trend: TrendAssessment,
    pub levels: Option<LevelSet>,
    pub predictions: Vec<Prediction>,
    /// Unix timestamp (milliseconds) when computed.
    pub timestamp: i64,
}

/// Per-bar indicator arrays aligned with `time`, for chart overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub symbol: String,
    pub time: Vec<i64>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub ema9: Vec<Option<f64>>,
    pub ema21: Vec<Option<f64>>,
    pub ema50: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
}

/// Result of a screener scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerResponse {
    /// Symbols requested.
    pub requested: usize,
    /// Symbols that could not be analyzed.
    pub failed: Vec<String>,
    /// Analyses sorted by score, highest first.
    pub results: Vec<StockAnalysis>,
    pub timestamp: i64,
}
