//! 认证服务

use std::sync::{Arc, LazyLock};

use halcon_auth_core::{Identity, TokenService};
use halcon_bootstrap::record_login_attempt;
use halcon_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::user::{HashedPassword, UserProfile, UserRepository};

/// 未知用户名时参与校验的占位哈希
static DUMMY_HASH: LazyLock<Option<HashedPassword>> =
    LazyLock::new(|| HashedPassword::from_plain("halcon-placeholder-password").ok());

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// 认证服务
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// 登录
    ///
    /// 用户不存在、已停用与密码错误统一返回 "invalid credentials"
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let user = self.users.find_active_by_username(req.username.trim()).await?;
        let verified = match &user {
            Some(user) => user.password_hash.verify(&req.password),
            None => {
                // 用户不存在时也执行一次哈希校验，耗时与密码错误一致
                if let Some(dummy) = DUMMY_HASH.as_ref() {
                    let _ = dummy.verify(&req.password);
                }
                Ok(false)
            }
        };
        let verified = verified.unwrap_or_else(|e| {
            error!(username = %req.username, error = %e, "Stored password hash is unusable");
            false
        });

        let user = match user {
            Some(user) if verified => user,
            _ => {
                record_login_attempt("failure");
                warn!(username = %req.username, "Login failed");
                return Err(invalid_credentials());
            }
        };

        let token = self.tokens.issue(&user.identity())?;
        record_login_attempt("success");
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token,
            user: user.profile(),
        })
    }

    /// 当前用户资料
    pub async fn current_user(&self, identity: &Identity) -> AppResult<UserProfile> {
        self.users
            .find_by_id(&identity.user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("invalid credentials")
}
