//! Numeric primitives shared by the indicators.
//!
//! Every per-bar function returns a vector the same length as its input,
//! with `None` for positions inside the warm-up window.

/// Simple moving average.
///
/// Position `i` is `None` for `i < period - 1`, otherwise the mean of
/// `values[i + 1 - period..=i]`.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period > 0, "sma period must be positive");

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

/// Exponential moving average seeded with the SMA of the first `period` values.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period > 0, "ema period must be positive");

    let mut result = vec![None; values.len()];
    if values.len() < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(prev);

    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        result[i] = Some(prev);
    }

    result
}

/// Population standard deviation (divides by N).
pub fn stddev(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their index.
///
/// Returns `None` when there are fewer than two points.
pub fn linear_regression_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }

    Some(covariance / variance)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Last defined value of a per-bar series, only if the final bar has one.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Percent change of the last value against the value `lookback` positions earlier.
pub fn percent_change(values: &[f64], lookback: usize) -> Option<f64> {
    let n = values.len();
    if lookback == 0 || n <= lookback {
        return None;
    }
    let base = values[n - 1 - lookback];
    if base == 0.0 {
        return None;
    }
    Some((values[n - 1] - base) / base * 100.0)
}
