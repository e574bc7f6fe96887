//! 认证中间件

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use halcon_auth_core::Identity;
use halcon_errors::AppError;
use tracing::{debug, warn};

use super::AppState;

/// 提取 `Authorization: Bearer <token>` 中的令牌，格式不符返回 None
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Bearer 认证中间件
///
/// 校验令牌并将 [`Identity`] 写入请求扩展，任何失败都在服务执行前返回 401
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            warn!("Missing or malformed authorization header");
            AppError::unauthorized("missing or malformed authorization header")
        })?;

    let identity: Identity = state
        .tokens
        .verify(token)
        .and_then(|claims| claims.identity())
        .map_err(|e| {
            warn!(error = %e, "Token validation failed");
            AppError::from(e)
        })?;

    debug!(user_id = %identity.user_id, role = %identity.role, "Token validated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
