//! Screener endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{parse_profile, ApiResponse};
use crate::config::parse_symbol_list;
use crate::error::{AppError, Result};
use crate::types::{Category, ScoringProfile, ScreenerResponse};
use crate::AppState;

/// Largest `limit` accepted by the daily picks endpoint.
pub const MAX_DAILY_PICKS: usize = 50;

/// Query parameters for the screener endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenerQuery {
    /// Comma-separated symbols; the configured watchlist when absent.
    pub symbols: Option<String>,
    /// Only keep results in this category.
    pub category: Option<String>,
    /// Scoring profile: screener or daily_picks
    pub profile: Option<String>,
}

/// Query parameters for the daily picks endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DailyPicksQuery {
    pub limit: Option<usize>,
}

/// Create the screener router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_screener))
        .route("/daily-picks", get(get_daily_picks))
}

fn parse_category(category: Option<&str>) -> Result<Option<Category>> {
    category
        .filter(|c| !c.trim().is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(|c| {
            Category::from_str(c.trim())
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", c)))
        })
        .transpose()
}

/// Scan symbols and return them ranked by score.
async fn get_screener(
    State(state): State<AppState>,
    Query(query): Query<ScreenerQuery>,
) -> Result<Json<ApiResponse<ScreenerResponse>>> {
    let profile: ScoringProfile = parse_profile(query.profile.as_deref())?;
    let category = parse_category(query.category.as_deref())?;

    let mut response = match query.symbols.as_deref() {
        Some(symbols) => {
            state
                .analysis
                .scan(&parse_symbol_list(symbols), profile)
                .await?
        }
        None => state.analysis.scan_watchlist(profile).await?,
    };

    if let Some(category) = category {
        response.results.retain(|a| a.category == category);
    }

    Ok(Json(ApiResponse::new(response)))
}

/// Today's strongest setups from the watchlist.
async fn get_daily_picks(
    State(state): State<AppState>,
    Query(query): Query<DailyPicksQuery>,
) -> Result<Json<ApiResponse<ScreenerResponse>>> {
    if let Some(limit) = query.limit {
        if limit == 0 || limit > MAX_DAILY_PICKS {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_DAILY_PICKS
            )));
        }
    }

    let picks = state.analysis.daily_picks(query.limit).await?;
    Ok(Json(ApiResponse::new(picks)))
}
