//! Technical indicator implementations.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod rsi;

pub use adx::{Adx, DEFAULT_ADX};
pub use atr::Atr;
pub use bollinger::{BollingerBands, BollingerSeries};
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;

use super::math::{ema, latest, sma};
use crate::types::{Bar, MacdSnapshot, OverlaySeries, Series};

/// Calculate True Range.
pub fn true_range(current: &Bar, previous: &Bar) -> f64 {
    let hl = current.high - current.low;
    let hc = (current.high - previous.close).abs();
    let lc = (current.low - previous.close).abs();
    hl.max(hc).max(lc)
}

/// +DM and -DM between two bars. Only the larger positive move counts;
/// ties count for neither side.
pub fn directional_movement(current: &Bar, previous: &Bar) -> (f64, f64) {
    let up_move = current.high - previous.high;
    let down_move = previous.low - current.low;

    let plus_dm = if up_move > down_move && up_move > 0.0 {
        up_move
    } else {
        0.0
    };
    let minus_dm = if down_move > up_move && down_move > 0.0 {
        down_move
    } else {
        0.0
    };

    (plus_dm, minus_dm)
}

/// Every indicator the dashboard uses, per bar and aligned with the series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub time: Vec<i64>,
    pub ema9: Vec<Option<f64>>,
    pub ema21: Vec<Option<f64>>,
    pub ema50: Vec<Option<f64>>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub adx: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub bollinger: BollingerSeries,
}

/// Indicator values at the latest bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub ema9: Option<f64>,
    pub ema21: Option<f64>,
    pub ema50: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdSnapshot>,
    pub adx: Option<f64>,
    pub atr: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
}

impl IndicatorSet {
    /// Compute all indicators with their standard periods.
    pub fn compute(series: &Series) -> Self {
        let closes = series.closes();

        Self {
            time: series.times(),
            ema9: ema(&closes, 9),
            ema21: ema(&closes, 21),
            ema50: ema(&closes, 50),
            sma20: sma(&closes, 20),
            sma50: sma(&closes, 50),
            sma200: sma(&closes, 200),
            rsi: Rsi::default().compute(&closes),
            macd: Macd::default().compute(&closes),
            adx: Adx::default().compute(&series.bars),
            atr: Atr::default().compute(&series.bars),
            bollinger: BollingerBands::default().compute(&closes),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Scalar values at the latest bar.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        let macd = match (
            latest(&self.macd.macd),
            latest(&self.macd.signal),
            latest(&self.macd.histogram),
        ) {
            (Some(macd), Some(signal), Some(histogram)) => Some(MacdSnapshot {
                macd,
                signal,
                histogram,
            }),
            _ => None,
        };

        IndicatorSnapshot {
            ema9: latest(&self.ema9),
            ema21: latest(&self.ema21),
            ema50: latest(&self.ema50),
            sma20: latest(&self.sma20),
            sma50: latest(&self.sma50),
            sma200: latest(&self.sma200),
            rsi: latest(&self.rsi),
            macd,
            adx: latest(&self.adx),
            atr: latest(&self.atr),
            bb_upper: latest(&self.bollinger.upper),
            bb_middle: latest(&self.bollinger.middle),
            bb_lower: latest(&self.bollinger.lower),
        }
    }

    /// Chart overlay arrays for the presentation layer.
    pub fn overlay(&self, symbol: &str) -> OverlaySeries {
        OverlaySeries {
            symbol: symbol.to_uppercase(),
            time: self.time.clone(),
            sma20: self.sma20.clone(),
            sma50: self.sma50.clone(),
            sma200: self.sma200.clone(),
            ema9: self.ema9.clone(),
            ema21: self.ema21.clone(),
            ema50: self.ema50.clone(),
            bb_upper: self.bollinger.upper.clone(),
            bb_middle: self.bollinger.middle.clone(),
            bb_lower: self.bollinger.lower.clone(),
            rsi: self.rsi.clone(),
            macd: self.macd.macd.clone(),
            macd_signal: self.macd.signal.clone(),
            macd_histogram: self.macd.histogram.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: 0,
            open: close,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_true_range_uses_gap() {
        let previous = bar(11.0, 9.0, 10.0);
        assert_eq!(true_range(&bar(16.0, 14.0, 15.0), &previous), 6.0);
        assert_eq!(true_range(&bar(11.0, 8.0, 9.0), &previous), 3.0);
    }

    #[test]
    fn test_directional_movement_tie_break() {
        let previous = bar(10.0, 5.0, 7.0);
        assert_eq!(directional_movement(&bar(12.0, 4.0, 8.0), &previous), (2.0, 0.0));
        assert_eq!(directional_movement(&bar(11.0, 2.0, 3.0), &previous), (0.0, 3.0));
        // Equal moves cancel out
        assert_eq!(directional_movement(&bar(12.0, 3.0, 7.0), &previous), (0.0, 0.0));
        // Inside bar
        assert_eq!(directional_movement(&bar(9.0, 6.0, 7.0), &previous), (0.0, 0.0));
    }

    #[test]
    fn test_indicator_set_lengths() {
        let bars: Vec<Bar> = (0..120)
            .map(|i| Bar {
                time: i,
                open: 100.0,
                high: 101.0 + i as f64 * 0.1,
                low: 99.0 + i as f64 * 0.1,
                close: 100.0 + i as f64 * 0.1,
                volume: 1000.0,
            })
            .collect();
        let set = IndicatorSet::compute(&Series::new("TEST", bars));

        assert_eq!(set.len(), 120);
        for arr in [&set.ema9, &set.sma200, &set.rsi, &set.adx, &set.atr, &set.bollinger.upper] {
            assert_eq!(arr.len(), 120);
        }

        let snapshot = set.snapshot();
        assert!(snapshot.sma50.is_some());
        assert!(snapshot.sma200.is_none());
        assert!(snapshot.macd.is_some());

        let overlay = set.overlay("test");
        assert_eq!(overlay.symbol, "TEST");
        assert_eq!(overlay.bb_middle, set.sma20);
    }
}
