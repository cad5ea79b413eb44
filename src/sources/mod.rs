//! Market data providers.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::types::MarketSnapshot;
use async_trait::async_trait;

/// Source of history and live quotes for analysis requests.
///
/// Timeouts and retries are the provider's concern; the engine only sees
/// the returned snapshot.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Fetch daily history plus the latest quote for a symbol.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot>;
}
