//! Average True Range (ATR) indicator.

use super::true_range;
use crate::services::signals::math::latest;
use crate::types::Bar;

/// ATR (Average True Range) indicator.
///
/// Measures market volatility as the simple mean of the trailing true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "atr period must be positive");
        Self { period }
    }

    /// Bars needed before the first value appears.
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// Per-bar ATR; the first value lands at index `period`.
    pub fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = vec![None; bars.len()];
        if bars.len() < self.min_periods() {
            return result;
        }

        let true_ranges: Vec<f64> = bars
            .windows(2)
            .map(|pair| true_range(&pair[1], &pair[0]))
            .collect();

        for i in self.period..bars.len() {
            let window = &true_ranges[(i - self.period)..i];
            result[i] = Some(window.iter().sum::<f64>() / self.period as f64);
        }

        result
    }

    /// ATR at the latest bar.
    pub fn current(&self, bars: &[Bar]) -> Option<f64> {
        latest(&self.compute(bars))
    }
}
