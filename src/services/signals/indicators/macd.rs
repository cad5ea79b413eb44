//! MACD (Moving Average Convergence Divergence) indicator.

use crate::services::signals::math::{ema, latest};
use crate::types::MacdSnapshot;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of the defined MACD Line values
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Per-bar MACD arrays, aligned with the input closes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(
            fast_period > 0 && slow_period > 0 && signal_period > 0,
            "macd periods must be positive"
        );
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Closes needed before the histogram is defined.
    pub fn min_periods(&self) -> usize {
        self.fast_period.max(self.slow_period) + self.signal_period - 1
    }

    /// Full per-bar arrays for chart overlays.
    pub fn compute(&self, closes: &[f64]) -> MacdSeries {
        let fast = ema(closes, self.fast_period);
        let slow = ema(closes, self.slow_period);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        // Signal line runs over the defined MACD values only, then is realigned
        let defined: Vec<(usize, f64)> = macd
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        let defined_values: Vec<f64> = defined.iter().map(|(_, v)| *v).collect();
        let signal_values = ema(&defined_values, self.signal_period);

        let mut signal = vec![None; closes.len()];
        for ((index, _), value) in defined.iter().zip(signal_values) {
            signal[*index] = value;
        }

        let histogram = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            })
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }

    /// Scalar values at the latest bar, for scoring.
    pub fn snapshot(&self, closes: &[f64]) -> Option<MacdSnapshot> {
        let series = self.compute(closes);
        Some(MacdSnapshot {
            macd: latest(&series.macd)?,
            signal: latest(&series.signal)?,
            histogram: latest(&series.histogram)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_alignment() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let series = Macd::default().compute(&closes);

        assert_eq!(series.macd.len(), 60);
        assert_eq!(series.signal.len(), 60);
        assert_eq!(series.histogram.len(), 60);
        assert!(series.macd[24].is_none());
        assert!(series.macd[25].is_some());
        assert!(series.signal[32].is_none());
        assert!(series.signal[33].is_some());
        assert!(series.histogram[33].is_some());
    }

    #[test]
    fn test_macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..80).map(|i| 50.0 + i as f64 * 0.5).collect();
        let series = Macd::default().compute(&closes);
        for i in 33..80 {
            let expected = series.macd[i].unwrap() - series.signal[i].unwrap();
            assert!((series.histogram[i].unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_snapshot_matches_last_bar() {
        let closes: Vec<f64> = (0..80).map(|i| 50.0 + i as f64 * 0.5).collect();
        let macd = Macd::default();
        let series = macd.compute(&closes);
        let snapshot = macd.snapshot(&closes).unwrap();
        assert_eq!(Some(snapshot.histogram), series.histogram[79]);
        assert!(snapshot.macd > 0.0, "rising closes should give a positive MACD line");
    }

    #[test]
    fn test_macd_insufficient_data() {
        let closes: Vec<f64> = (0..30).map(|i| i as f64).collect();
        assert!(Macd::default().snapshot(&closes).is_none());
    }
}
