//! Composite 0-100 score from independent indicator adjustments.

use crate::types::Rating;

/// Neutral starting score.
pub const BASE_SCORE: i32 = 50;

/// Values the composite score looks at. `None` means the indicator is still
/// warming up and contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub price: f64,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    /// Short-term volume average over the longer-term average.
    pub volume_trend: Option<f64>,
}

/// RSI buckets in evaluation order; first match wins.
pub static RSI_BUCKETS: [(fn(f64) -> bool, i32); 4] = [
    (oversold, 20),
    (below_midline, 10),
    (overbought, -15),
    (elevated, -5),
];

fn oversold(rsi: f64) -> bool {
    rsi < 30.0
}

fn below_midline(rsi: f64) -> bool {
    rsi < 50.0
}

fn overbought(rsi: f64) -> bool {
    rsi > 70.0
}

fn elevated(rsi: f64) -> bool {
    rsi > 60.0
}

/// One scored component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub name: &'static str,
    pub points: i32,
}

/// Final score with the adjustments that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub adjustments: Vec<Adjustment>,
}

impl ScoreBreakdown {
    pub fn rating(&self) -> Rating {
        Rating::from_score(self.score)
    }
}

fn rsi_points(rsi: f64) -> i32 {
    RSI_BUCKETS
        .iter()
        .find(|(matches, _)| matches(rsi))
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Any histogram that is not strictly positive, zero included, scores as bearish.
fn macd_points(histogram: f64) -> i32 {
    if histogram > 0.0 {
        15
    } else {
        -10
    }
}

fn moving_average_points(price: f64, average: f64) -> i32 {
    if price > average {
        12
    } else {
        -8
    }
}

fn volume_points(volume_trend: f64) -> i32 {
    if volume_trend > 1.1 {
        6
    } else if volume_trend < 0.9 {
        -4
    } else {
        0
    }
}

/// Score the inputs, clamped to 0-100.
pub fn score(inputs: &ScoreInputs) -> ScoreBreakdown {
    let components: [(&'static str, Option<i32>); 5] = [
        ("rsi", inputs.rsi.map(rsi_points)),
        ("macd", inputs.macd_histogram.map(macd_points)),
        (
            "sma50",
            inputs.sma50.map(|avg| moving_average_points(inputs.price, avg)),
        ),
        (
            "sma200",
            inputs.sma200.map(|avg| moving_average_points(inputs.price, avg)),
        ),
        ("volume", inputs.volume_trend.map(volume_points)),
    ];

    let adjustments: Vec<Adjustment> = components
        .into_iter()
        .filter_map(|(name, points)| points.map(|points| Adjustment { name, points }))
        .collect();

    let total = BASE_SCORE + adjustments.iter().map(|a| a.points).sum::<i32>();

    ScoreBreakdown {
        score: total.clamp(0, 100) as u8,
        adjustments,
    }
}
