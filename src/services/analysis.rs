//! Analysis service.
//!
//! Fetches market snapshots through the configured provider, caches them,
//! and runs the signal engine over them on request.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::cache::CacheStore;
use crate::services::signals::Analysis;
use crate::sources::MarketDataProvider;
use crate::types::{
    Category, LevelSet, MarketSnapshot, OverlaySeries, Prediction, ScoringProfile,
    ScreenerResponse, StockAnalysis, TrendAssessment,
};
use futures_util::{stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on symbols accepted by a single scan.
pub const MAX_SCAN_SYMBOLS: usize = 100;

/// Snapshot cache shared between requests.
pub type SnapshotCache = dyn CacheStore<Arc<MarketSnapshot>>;

/// A value plus whether it was served from cache.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub data: T,
    pub cached: bool,
}

impl<T> Cached<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Cached<U> {
        Cached {
            data: f(self.data),
            cached: self.cached,
        }
    }
}

/// Tunables for the analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub cache_ttl: Duration,
    pub scan_concurrency: usize,
    pub watchlist: Vec<String>,
    pub daily_picks_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            scan_concurrency: 8,
            watchlist: Vec::new(),
            daily_picks_limit: 5,
        }
    }
}

impl From<&Config> for AnalysisOptions {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl: config.cache_ttl,
            scan_concurrency: config.scan_concurrency,
            watchlist: config.screener_symbols.clone(),
            daily_picks_limit: config.daily_picks_limit,
        }
    }
}

/// Runs the engine over provider data.
pub struct AnalysisService {
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<SnapshotCache>,
    options: AnalysisOptions,
}

/// Trim and uppercase a symbol, rejecting empty input.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Symbol must not be empty".to_string()));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(AppError::BadRequest(format!("Invalid symbol: {}", symbol)));
    }
    Ok(symbol)
}

impl AnalysisService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<SnapshotCache>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            provider,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Market snapshot for a symbol, from cache when fresh.
    pub async fn snapshot(&self, symbol: &str) -> Result<Cached<Arc<MarketSnapshot>>> {
        let symbol = normalize_symbol(symbol)?;

        if let Some(snapshot) = self.cache.get(&symbol) {
            debug!("Cache hit for {}", symbol);
            return Ok(Cached {
                data: snapshot,
                cached: true,
            });
        }

        debug!("Fetching {} from {}", symbol, self.provider.name());
        let snapshot = Arc::new(self.provider.fetch_snapshot(&symbol).await?);
        self.cache.set(symbol, snapshot.clone(), self.options.cache_ttl);

        Ok(Cached {
            data: snapshot,
            cached: false,
        })
    }

    /// Full per-symbol summary.
    pub async fn analyze(
        &self,
        symbol: &str,
        profile: ScoringProfile,
    ) -> Result<Cached<StockAnalysis>> {
        let snapshot = self.snapshot(symbol).await?;
        Ok(snapshot.map(|market| Analysis::new(&market).summary(profile)))
    }

    /// Per-bar indicator arrays for charting.
    pub async fn overlay(&self, symbol: &str) -> Result<Cached<OverlaySeries>> {
        let snapshot = self.snapshot(symbol).await?;
        Ok(snapshot.map(|market| Analysis::new(&market).overlay()))
    }

    pub async fn trend(&self, symbol: &str) -> Result<Cached<TrendAssessment>> {
        let snapshot = self.snapshot(symbol).await?;
        Ok(snapshot.map(|market| Analysis::new(&market).trend().clone()))
    }

    /// Support and resistance levels, `None` on short history.
    pub async fn levels(&self, symbol: &str) -> Result<Cached<Option<LevelSet>>> {
        let snapshot = self.snapshot(symbol).await?;
        Ok(snapshot.map(|market| Analysis::new(&market).levels()))
    }

    pub async fn predictions(&self, symbol: &str) -> Result<Cached<Vec<Prediction>>> {
        let snapshot = self.snapshot(symbol).await?;
        Ok(snapshot.map(|market| Analysis::new(&market).predictions()))
    }

    /// Analyze many symbols concurrently.
    ///
    /// Symbols that fail are logged and listed in `failed`; the rest are
    /// sorted by score, highest first.
    pub async fn scan(
        &self,
        symbols: &[String],
        profile: ScoringProfile,
    ) -> Result<ScreenerResponse> {
        let mut unique: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = normalize_symbol(symbol)?;
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }

        if unique.is_empty() {
            return Err(AppError::BadRequest("No symbols to scan".to_string()));
        }
        if unique.len() > MAX_SCAN_SYMBOLS {
            return Err(AppError::BadRequest(format!(
                "Too many symbols: {} (max {})",
                unique.len(),
                MAX_SCAN_SYMBOLS
            )));
        }

        let requested = unique.len();
        let outcomes: Vec<(String, Result<Cached<StockAnalysis>>)> = stream::iter(unique)
            .map(|symbol| async move {
                let outcome = self.analyze(&symbol, profile).await;
                (symbol, outcome)
            })
            .buffer_unordered(self.options.scan_concurrency.max(1))
            .collect()
            .await;

        let mut results = Vec::with_capacity(requested);
        let mut failed = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(analysis) => results.push(analysis.data),
                Err(e) => {
                    warn!("Skipping {} in scan: {}", symbol, e);
                    failed.push(symbol);
                }
            }
        }

        results.sort_by(|a, b| {
            b.ai_score
                .cmp(&a.ai_score)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        failed.sort();

        info!(
            requested,
            analyzed = results.len(),
            failed = failed.len(),
            "Scan complete"
        );

        Ok(ScreenerResponse {
            requested,
            failed,
            results,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Scan of the configured watchlist.
    pub async fn scan_watchlist(&self, profile: ScoringProfile) -> Result<ScreenerResponse> {
        self.scan(&self.options.watchlist, profile).await
    }

    /// Top daily-category picks from the watchlist, at most `limit`
    /// (the configured default when `None`).
    pub async fn daily_picks(&self, limit: Option<usize>) -> Result<ScreenerResponse> {
        let limit = limit.unwrap_or(self.options.daily_picks_limit);
        let mut response = self.scan_watchlist(ScoringProfile::DailyPicks).await?;
        response.results.retain(|a| a.category == Category::Daily);
        response.results.truncate(limit);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::Cache;
    use crate::types::{Bar, Quote, Series};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if symbol == "FAIL" {
                return Err(AppError::NotFound(format!("No data for {}", symbol)));
            }
            let step = if symbol == "DOWN" { -0.3 } else { 0.3 };
            let bars = (0..120)
                .map(|i| {
                    let close = 100.0 + step * i as f64;
                    Bar {
                        time: i * 86_400_000,
                        open: close,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        volume: 1_000.0,
                    }
                })
                .collect();
            let series = Series::new(symbol, bars);
            let quote = Quote::from_series(&series).unwrap();
            Ok(MarketSnapshot { series, quote })
        }
    }

    fn service() -> (Arc<StubProvider>, AnalysisService) {
        let provider = Arc::new(StubProvider {
            calls: AtomicUsize::new(0),
        });
        let cache: Arc<SnapshotCache> =
            Arc::new(Cache::<Arc<MarketSnapshot>>::new(Duration::from_secs(60)));
        let options = AnalysisOptions {
            watchlist: vec!["UP".to_string(), "DOWN".to_string()],
            ..Default::default()
        };
        let service = AnalysisService::new(provider.clone(), cache, options);
        (provider, service)
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert!(matches!(normalize_symbol("  "), Err(AppError::BadRequest(_))));
        assert!(matches!(normalize_symbol("a/b"), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_snapshot_is_cached() {
        let (provider, service) = service();

        let first = service.snapshot("up").await.unwrap();
        let second = service.snapshot("UP").await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scan_sorts_and_reports_failures() {
        let (_, service) = service();
        let symbols = vec![
            "down".to_string(),
            "up".to_string(),
            "FAIL".to_string(),
            "UP".to_string(),
        ];

        let response = service.scan(&symbols, ScoringProfile::Screener).await.unwrap();

        assert_eq!(response.requested, 3);
        assert_eq!(response.failed, vec!["FAIL".to_string()]);
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].ai_score >= response.results[1].ai_score);
    }

    #[tokio::test]
    async fn test_scan_rejects_empty() {
        let (_, service) = service();
        let result = service.scan(&[], ScoringProfile::Screener).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_daily_picks_only_daily_category() {
        let (_, service) = service();
        let picks = service.daily_picks(Some(1)).await.unwrap();
        assert!(picks.results.len() <= 1);
        assert!(picks.results.iter().all(|a| a.category == Category::Daily));
    }
}
