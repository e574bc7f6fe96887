//! 公开追踪

use axum::{
    Json,
    extract::{Query, State},
};
use halcon_errors::AppResult;

use crate::api::http::{AppState, ValidJson};
use crate::application::{TrackingQuery, TrackingResult};

pub async fn track_by_query(
    State(state): State<AppState>,
    Query(query): Query<TrackingQuery>,
) -> AppResult<Json<TrackingResult>> {
    Ok(Json(state.tracking.track(&query).await?))
}

pub async fn track_by_body(
    State(state): State<AppState>,
    ValidJson(query): ValidJson<TrackingQuery>,
) -> AppResult<Json<TrackingResult>> {
    Ok(Json(state.tracking.track(&query).await?))
}
