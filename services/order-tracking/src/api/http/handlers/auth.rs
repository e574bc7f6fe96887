//! 认证

use axum::{Json, extract::State};
use halcon_errors::AppResult;

use crate::api::http::{AppState, AuthIdentity, ValidJson};
use crate::application::{LoginRequest, LoginResponse};
use crate::domain::user::UserProfile;

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(state.auth.login(req).await?))
}

pub async fn me(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.auth.current_user(&identity).await?))
}
