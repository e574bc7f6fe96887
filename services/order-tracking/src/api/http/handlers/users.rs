//! 用户管理

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use halcon_errors::AppResult;

use super::MessageResponse;
use crate::api::http::{AppState, AuthIdentity, ValidJson, parse_user_id};
use crate::application::{CreateUserCommand, UpdateUserCommand};
use crate::domain::user::UserView;

pub async fn list(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> AppResult<Json<Vec<UserView>>> {
    Ok(Json(state.users.list(&identity).await?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>> {
    let id = parse_user_id(&id)?;
    Ok(Json(state.users.get(&identity, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    ValidJson(cmd): ValidJson<CreateUserCommand>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let user = state.users.create(&identity, cmd).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
    ValidJson(cmd): ValidJson<UpdateUserCommand>,
) -> AppResult<Json<UserView>> {
    let id = parse_user_id(&id)?;
    Ok(Json(state.users.update(&identity, id, cmd).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_user_id(&id)?;
    state.users.delete(&identity, id).await?;
    Ok(Json(MessageResponse {
        message: "user deleted successfully",
    }))
}
