//! Relative Strength Index (RSI) indicator.

use crate::services::signals::math::latest;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses,
/// using Wilder's smoothing after a simple-mean seed.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "rsi period must be positive");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Closes needed before the first value appears.
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// Per-bar RSI; the first value lands at index `period`.
    pub fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; closes.len()];
        if closes.len() < self.min_periods() {
            return result;
        }

        let period = self.period as f64;

        // Seed averages from the first `period` deltas
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let (gain, loss) = split_change(closes[i] - closes[i - 1]);
            avg_gain += gain;
            avg_loss += loss;
        }
        avg_gain /= period;
        avg_loss /= period;
        result[self.period] = Some(rsi_value(avg_gain, avg_loss));

        for i in (self.period + 1)..closes.len() {
            let (gain, loss) = split_change(closes[i] - closes[i - 1]);
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            result[i] = Some(rsi_value(avg_gain, avg_loss));
        }

        result
    }

    /// RSI at the latest bar.
    pub fn current(&self, closes: &[f64]) -> Option<f64> {
        latest(&self.compute(closes))
    }
}

fn split_change(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

/// Average loss of exactly zero reports 100 rather than dividing by zero.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
