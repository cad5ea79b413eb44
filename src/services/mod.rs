pub mod analysis;
pub mod cache;
pub mod signals;

pub use analysis::{AnalysisOptions, AnalysisService, Cached, SnapshotCache};
pub use cache::{Cache, CacheStore};
pub use signals::{Analysis, IndicatorSet, IndicatorSnapshot};
