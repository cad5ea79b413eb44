//! Multi-horizon price projection.
//!
//! Extends the recent regression slope, scaled by the trend, and widens the
//! range with the square root of the horizon times ATR.

use super::math::linear_regression_slope;
use crate::types::{Prediction, TrendDirection};

/// Horizons projected, in days.
pub const HORIZONS: [u32; 3] = [7, 14, 30];
/// Closes the regression slope is fitted over.
pub const SLOPE_WINDOW: usize = 30;
/// ATR multiple applied to the volatility band.
pub const BAND_ATR_MULTIPLIER: f64 = 1.5;

/// Inputs for one projection run.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs {
    pub price: f64,
    pub slope: f64,
    pub atr: f64,
    pub trend: TrendDirection,
}

impl ProjectionInputs {
    /// Fit the slope over the trailing closes.
    ///
    /// Returns `None` when there are too few closes for a slope or ATR is
    /// still warming up.
    pub fn from_closes(
        closes: &[f64],
        price: f64,
        atr: Option<f64>,
        trend: TrendDirection,
    ) -> Option<Self> {
        let window = &closes[closes.len().saturating_sub(SLOPE_WINDOW)..];
        Some(Self {
            price,
            slope: linear_regression_slope(window)?,
            atr: atr?,
            trend,
        })
    }
}

/// Confidence for a horizon; never below 30.
pub fn confidence(days: u32) -> f64 {
    (85.0 - days as f64).max(30.0)
}

/// Project a single horizon.
pub fn project(inputs: &ProjectionInputs, days: u32) -> Prediction {
    let d = days as f64;
    let expected_change = inputs.slope * d * inputs.trend.projection_multiplier();
    let band = d.sqrt() * inputs.atr * BAND_ATR_MULTIPLIER;
    let expected = (inputs.price + expected_change).max(0.0);

    Prediction {
        horizon: days,
        expected,
        min: (expected - band).max(0.0),
        max: expected + band,
        confidence: confidence(days),
    }
}

/// Project every standard horizon.
pub fn project_all(inputs: &ProjectionInputs) -> Vec<Prediction> {
    HORIZONS.iter().map(|days| project(inputs, *days)).collect()
}
