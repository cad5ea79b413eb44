//! Average Directional Index (ADX) indicator.

use super::{directional_movement, true_range};
use crate::services::signals::math::latest;
use crate::types::Bar;

/// Value reported when the directional index cannot be computed
/// (flat range or no directional movement).
pub const DEFAULT_ADX: f64 = 25.0;

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// This variant sums directional movement and true range over the trailing
/// window instead of applying Wilder's recursive smoothing. Downstream
/// thresholds (ADX > 25, ADX < 20) are tuned against this form.
pub struct Adx {
    period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "adx period must be positive");
        Self { period }
    }

    /// Bars needed before the first value appears.
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// Per-bar ADX; the first value lands at index `period`.
    pub fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = vec![None; bars.len()];
        if bars.len() < self.min_periods() {
            return result;
        }

        // Index j holds the movement from bar j to bar j + 1
        let mut plus_dm = Vec::with_capacity(bars.len() - 1);
        let mut minus_dm = Vec::with_capacity(bars.len() - 1);
        let mut tr = Vec::with_capacity(bars.len() - 1);
        for pair in bars.windows(2) {
            let (plus, minus) = directional_movement(&pair[1], &pair[0]);
            plus_dm.push(plus);
            minus_dm.push(minus);
            tr.push(true_range(&pair[1], &pair[0]));
        }

        for i in self.period..bars.len() {
            let window = (i - self.period)..i;
            let plus_sum: f64 = plus_dm[window.clone()].iter().sum();
            let minus_sum: f64 = minus_dm[window.clone()].iter().sum();
            let tr_sum: f64 = tr[window].iter().sum();
            result[i] = Some(directional_index(plus_sum, minus_sum, tr_sum));
        }

        result
    }

    /// ADX at the latest bar.
    pub fn current(&self, bars: &[Bar]) -> Option<f64> {
        latest(&self.compute(bars))
    }
}

/// DX from trailing sums, falling back to [`DEFAULT_ADX`] on degenerate input.
fn directional_index(plus_dm_sum: f64, minus_dm_sum: f64, tr_sum: f64) -> f64 {
    if tr_sum == 0.0 {
        return DEFAULT_ADX;
    }

    let plus_di = plus_dm_sum / tr_sum * 100.0;
    let minus_di = minus_dm_sum / tr_sum * 100.0;
    let dx = (plus_di - minus_di).abs() / (plus_di + minus_di) * 100.0;

    if dx.is_finite() {
        dx
    } else {
        DEFAULT_ADX
    }
}
