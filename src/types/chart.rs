use serde::{Deserialize, Serialize};

/// Trailing bars treated as one trading year for 52-week extremes.
pub const BARS_PER_YEAR: usize = 252;

/// OHLCV bar as delivered by the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp (milliseconds) of the bar open.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered bars for one symbol over one window, ascending by time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl Series {
    /// Build a series, sorting by time and dropping duplicate timestamps.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.time);
        bars.dedup_by_key(|b| b.time);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn times(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.time).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Highest high over the trailing `n` bars.
    pub fn trailing_high(&self, n: usize) -> Option<f64> {
        let start = self.bars.len().saturating_sub(n);
        self.bars[start..]
            .iter()
            .map(|b| b.high)
            .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |a| a.max(h))))
    }

    /// Lowest low over the trailing `n` bars.
    pub fn trailing_low(&self, n: usize) -> Option<f64> {
        let start = self.bars.len().saturating_sub(n);
        self.bars[start..]
            .iter()
            .map(|b| b.low)
            .fold(None, |acc: Option<f64>, l| Some(acc.map_or(l, |a| a.min(l))))
    }
}

/// Live quote snapshot for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    pub volume: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl Quote {
    /// Derive a quote from the series alone.
    ///
    /// Used when the provider returns history without a live quote.
    pub fn from_series(series: &Series) -> Option<Self> {
        let last = series.last()?;
        let prev_close = series
            .bars
            .len()
            .checked_sub(2)
            .map(|i| series.bars[i].close)
            .unwrap_or(last.close);

        Some(Self {
            symbol: series.symbol.clone(),
            price: last.close,
            high: last.high,
            low: last.low,
            prev_close,
            volume: last.volume,
            high_52w: series.trailing_high(BARS_PER_YEAR)?,
            low_52w: series.trailing_low(BARS_PER_YEAR)?,
            market_cap: None,
        })
    }

    /// Percent change from the previous close.
    pub fn change_pct(&self) -> f64 {
        if self.prev_close > 0.0 {
            (self.price - self.prev_close) / self.prev_close * 100.0
        } else {
            0.0
        }
    }
}

/// History plus live quote, as fetched for one analysis request.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub series: Series,
    pub quote: Quote,
}
