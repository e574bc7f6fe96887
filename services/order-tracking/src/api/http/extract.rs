//! 请求提取器

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use halcon_auth_core::Identity;
use halcon_common::{OrderId, UserId};
use halcon_errors::AppError;
use serde::de::DeserializeOwned;

/// JSON 请求体，解析失败返回 400
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("invalid request: {}", e.body_text())))?;
        Ok(Self(value))
    }
}

/// 已认证身份提取器
///
/// 由 `auth_middleware` 写入请求扩展，缺失时返回 401
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or_else(|| AppError::unauthorized("invalid or expired token"))
    }
}

/// 路径中的 ID 格式不合法时按不存在处理
pub(crate) fn parse_order_id(raw: &str) -> Result<OrderId, AppError> {
    OrderId::from_string(raw).map_err(|_| AppError::not_found("order not found"))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    UserId::from_string(raw).map_err(|_| AppError::not_found("user not found"))
}
