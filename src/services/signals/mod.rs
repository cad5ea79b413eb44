//! Technical analysis engine.
//!
//! Indicator calculations, trend and level detection, composite scoring,
//! category classification and price projection. Everything here is a pure
//! function of a [`MarketSnapshot`](crate::types::MarketSnapshot): no I/O,
//! no caching and no shared state, so symbols can be analyzed in parallel.

pub mod analyzer;
pub mod categories;
pub mod indicators;
pub mod levels;
pub mod math;
pub mod predictions;
pub mod scoring;
pub mod trend;

pub use analyzer::{Analysis, VolumeMetrics};
pub use indicators::{IndicatorSet, IndicatorSnapshot};
