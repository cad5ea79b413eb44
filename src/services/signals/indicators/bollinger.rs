//! Bollinger Bands indicator.

use crate::services::signals::math::stddev;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// Standard deviation is the population form so bands match charting
/// packages bar for bar.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// Per-bar band values; all three are `None` for the first `period - 1` bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 0, "bollinger period must be positive");
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    pub fn compute(&self, closes: &[f64]) -> BollingerSeries {
        let n = closes.len();
        let mut bands = BollingerSeries {
            upper: vec![None; n],
            middle: vec![None; n],
            lower: vec![None; n],
        };

        for i in (self.period.saturating_sub(1))..n {
            let window = &closes[(i + 1 - self.period)..=i];
            let middle = window.iter().sum::<f64>() / self.period as f64;
            let width = self.std_dev_multiplier * stddev(window);

            bands.upper[i] = Some(middle + width);
            bands.middle[i] = Some(middle);
            bands.lower[i] = Some(middle - width);
        }

        bands
    }
}
