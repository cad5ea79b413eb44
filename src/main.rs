use quantboard::config::Config;
use quantboard::services::{AnalysisOptions, AnalysisService, Cache, SnapshotCache};
use quantboard::sources::{MarketDataProvider, YahooFinanceClient};
use quantboard::types::MarketSnapshot;
use quantboard::{app, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between sweeps of expired cache entries.
const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting Quantboard server on {}", config.bind_address());

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceClient::new(
        config.provider_timeout,
        config.history_range.clone(),
        config.history_interval.clone(),
    )?);
    info!(
        "Using {} for {} of {} bars, cache TTL {:?}",
        provider.name(),
        config.history_range,
        config.history_interval,
        config.cache_ttl
    );

    let cache = Arc::new(Cache::<Arc<MarketSnapshot>>::new(config.cache_ttl));
    {
        let cache = cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                cache.cleanup();
            }
        });
    }

    let snapshot_cache: Arc<SnapshotCache> = cache;
    let analysis = Arc::new(AnalysisService::new(
        provider,
        snapshot_cache,
        AnalysisOptions::from(config.as_ref()),
    ));
    info!(
        "Screener watchlist has {} symbols",
        analysis.options().watchlist.len()
    );

    let state = AppState {
        config: config.clone(),
        analysis,
    };

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Quantboard server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
