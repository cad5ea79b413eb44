use std::env;
use std::time::Duration;

/// Symbols scanned by the screener and daily picks when none are configured.
pub const DEFAULT_WATCHLIST: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "AMD", "NFLX", "AVGO", "JPM", "V",
    "UNH", "XOM", "COST", "SPY", "QQQ",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// How long fetched market snapshots stay cached.
    pub cache_ttl: Duration,
    /// History range requested from the provider (e.g. "1y").
    pub history_range: String,
    /// Bar interval requested from the provider (e.g. "1d").
    pub history_interval: String,
    /// Timeout for provider requests.
    pub provider_timeout: Duration,
    /// Symbols fetched in parallel during a scan.
    pub scan_concurrency: usize,
    /// Default watchlist for the screener and daily picks.
    pub screener_symbols: Vec<String>,
    /// Default number of daily picks returned.
    pub daily_picks_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let screener_symbols = lookup("SCREENER_SYMBOLS")
            .map(|s| parse_symbol_list(&s))
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or_else(|| DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect());

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(3001),
            cache_ttl: Duration::from_secs(parsed("CACHE_TTL_SECS").unwrap_or(60)),
            history_range: lookup("HISTORY_RANGE").unwrap_or_else(|| "1y".to_string()),
            history_interval: lookup("HISTORY_INTERVAL").unwrap_or_else(|| "1d".to_string()),
            provider_timeout: Duration::from_secs(
                parsed("PROVIDER_TIMEOUT_SECS").filter(|s| *s > 0).unwrap_or(30),
            ),
            scan_concurrency: parsed("SCAN_CONCURRENCY")
                .filter(|n| *n > 0)
                .unwrap_or(8) as usize,
            screener_symbols,
            daily_picks_limit: parsed("DAILY_PICKS_LIMIT")
                .filter(|n| *n > 0)
                .unwrap_or(5) as usize,
        }
    }

    /// Socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Split a comma-separated symbol list, trimming and uppercasing entries.
pub fn parse_symbol_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|sym| sym.trim().to_uppercase())
        .filter(|sym| !sym.is_empty())
        .collect()
}
