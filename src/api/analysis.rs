//! Per-symbol analysis endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{parse_profile, ApiResponse};
use crate::error::Result;
use crate::types::{LevelSet, OverlaySeries, Prediction, StockAnalysis, TrendAssessment};
use crate::AppState;

/// Query parameters for the analysis endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Scoring profile: screener or daily_picks
    pub profile: Option<String>,
}

/// Create the analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_analysis))
        .route("/:symbol/overlay", get(get_overlay))
        .route("/:symbol/trend", get(get_trend))
        .route("/:symbol/levels", get(get_levels))
        .route("/:symbol/predictions", get(get_predictions))
}

/// Full summary for a symbol.
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<StockAnalysis>>> {
    let profile = parse_profile(query.profile.as_deref())?;
    let analysis = state.analysis.analyze(&symbol, profile).await?;
    Ok(Json(analysis.into()))
}

/// Per-bar indicator arrays for chart overlays.
async fn get_overlay(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<OverlaySeries>>> {
    let overlay = state.analysis.overlay(&symbol).await?;
    Ok(Json(overlay.into()))
}

async fn get_trend(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<TrendAssessment>>> {
    let trend = state.analysis.trend(&symbol).await?;
    Ok(Json(trend.into()))
}

/// Support/resistance levels; `data` is null when history is too short.
async fn get_levels(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Option<LevelSet>>>> {
    let levels = state.analysis.levels(&symbol).await?;
    Ok(Json(levels.into()))
}

async fn get_predictions(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<Prediction>>>> {
    let predictions = state.analysis.predictions(&symbol).await?;
    Ok(Json(predictions.into()))
}
