pub mod analysis;
pub mod health;
pub mod screener;

use crate::error::{AppError, Result};
use crate::services::Cached;
use crate::types::ScoringProfile;
use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub cached: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta { cached: false },
        }
    }
}

impl<T> From<Cached<T>> for ApiResponse<T> {
    fn from(value: Cached<T>) -> Self {
        Self {
            data: value.data,
            meta: ApiMeta {
                cached: value.cached,
            },
        }
    }
}

/// Parse an optional `profile` query value, defaulting to the screener.
pub(crate) fn parse_profile(profile: Option<&str>) -> Result<ScoringProfile> {
    match profile {
        None => Ok(ScoringProfile::default()),
        Some(s) => ScoringProfile::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown profile: {}", s))),
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/screener", screener::router())
}
