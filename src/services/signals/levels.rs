//! Support and resistance detection.
//!
//! Classic floor-trader pivots over the recent range, merged with swing
//! highs and lows confirmed by a symmetric lookback/lookahead window.

use crate::types::{Bar, LevelSet};

/// Bars considered for swing detection.
pub const LEVEL_WINDOW: usize = 50;
/// Trailing bars of the level window used for the pivot formulas.
pub const PIVOT_WINDOW: usize = 20;
/// Bars on each side a swing point must dominate.
pub const SWING_SPAN: usize = 5;
/// Levels reported on each side of the price.
pub const MAX_LEVELS: usize = 3;

/// Classic pivot point levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotPoints {
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

impl PivotPoints {
    /// Pivots from the range high, range low and last close of `bars`.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        let close = bars.last()?.close;
        let high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        Some(Self::from_hlc(high, low, close))
    }

    pub fn from_hlc(high: f64, low: f64, close: f64) -> Self {
        let pivot = (high + low + close) / 3.0;
        Self {
            pivot,
            r1: 2.0 * pivot - low,
            r2: pivot + (high - low),
            r3: high + 2.0 * (pivot - low),
            s1: 2.0 * pivot - high,
            s2: pivot - (high - low),
            s3: low - 2.0 * (high - pivot),
        }
    }
}

/// Swing highs and lows, in bar order.
pub fn swing_points(bars: &[Bar], span: usize) -> (Vec<f64>, Vec<f64>) {
    let mut highs = Vec::new();
    let mut lows = Vec::new();
    if span == 0 || bars.len() < 2 * span + 1 {
        return (highs, lows);
    }

    for i in span..(bars.len() - span) {
        let before = &bars[i - span..i];
        let after = &bars[i + 1..=i + span];
        let current = &bars[i];

        if before.iter().chain(after).all(|b| current.high >= b.high) {
            highs.push(current.high);
        }
        if before.iter().chain(after).all(|b| current.low <= b.low) {
            lows.push(current.low);
        }
    }

    (highs, lows)
}

/// Support and resistance around `price` from the trailing bars.
///
/// Returns `None` for an empty series.
pub fn detect(bars: &[Bar], price: f64) -> Option<LevelSet> {
    let window = &bars[bars.len().saturating_sub(LEVEL_WINDOW)..];
    let recent = &window[window.len().saturating_sub(PIVOT_WINDOW)..];
    let pivots = PivotPoints::from_bars(recent)?;
    let (swing_highs, swing_lows) = swing_points(window, SWING_SPAN);

    let mut resistance: Vec<f64> = [pivots.r1, pivots.r2, pivots.r3]
        .into_iter()
        .chain(swing_highs)
        .filter(|level| *level > price)
        .collect();
    resistance.sort_by(|a, b| a.total_cmp(b));
    resistance.truncate(MAX_LEVELS);

    let mut support: Vec<f64> = [pivots.s1, pivots.s2, pivots.s3]
        .into_iter()
        .chain(swing_lows)
        .filter(|level| *level < price)
        .collect();
    support.sort_by(|a, b| b.total_cmp(a));
    support.truncate(MAX_LEVELS);

    Some(LevelSet {
        support,
        resistance,
        pivot: pivots.pivot,
    })
}
