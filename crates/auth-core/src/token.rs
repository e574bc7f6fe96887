//! 会话令牌
//!
//! HS256 签名的 JWT，内嵌签发时的用户 ID、用户名与角色快照。
//! 没有吊销列表，过期是唯一的失效方式。

use chrono::{DateTime, Duration, Utc};
use halcon_common::UserId;
use halcon_errors::AppError;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Identity, Role};

/// 默认令牌有效期
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// 签发时的角色
    pub role: Role,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// 解析为强类型身份
    pub fn identity(&self) -> Result<Identity, TokenError> {
        let user_id = UserId::from_string(&self.sub).map_err(|_| TokenError::InvalidClaims)?;
        Ok(Identity::new(user_id, self.username.clone(), self.role))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature mismatch")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token claims are invalid")]
    InvalidClaims,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AppError::internal(format!("Failed to generate token: {}", msg)),
            _ => AppError::unauthorized("invalid or expired token"),
        }
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    issuer: String,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
            issuer: issuer.into(),
        }
    }

    /// 签发令牌
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// 以指定时间签发令牌
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: identity.user_id.to_string(),
            username: identity.username.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// 校验令牌
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// 以指定时间校验令牌
    ///
    /// `now > exp` 即视为过期，不允许时间偏差
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        // 过期在下方按传入的时钟判断
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
                    TokenError::InvalidClaims
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-chars-long";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS), "halcon")
    }

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(), "warehouse1".to_string(), role)
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = service();
        let who = identity(Role::Warehouse);
        let token = svc.issue(&who).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.username, "warehouse1");
        assert_eq!(claims.role, Role::Warehouse);
        assert_eq!(claims.identity().unwrap(), who);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expiry_boundaries() {
        let svc = service();
        let issued = Utc::now();
        let token = svc.issue_at(&identity(Role::Sales), issued).unwrap();

        assert!(svc.verify_at(&token, issued).is_ok());
        assert!(
            svc.verify_at(&token, issued + Duration::hours(23) + Duration::minutes(59))
                .is_ok()
        );
        assert_eq!(
            svc.verify_at(&token, issued + Duration::hours(24) + Duration::seconds(1))
                .unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = TokenService::new("wrong_secret_wrong_secret_wrong_secret", Duration::hours(1), "halcon");
        let token = other.issue(&identity(Role::Admin)).unwrap();

        assert_eq!(service().verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(service().verify("not.a.jwt").unwrap_err(), TokenError::Malformed);
        assert_eq!(service().verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let other = TokenService::new(SECRET, Duration::hours(1), "someone-else");
        let token = other.issue(&identity(Role::Admin)).unwrap();

        assert_eq!(service().verify(&token).unwrap_err(), TokenError::InvalidClaims);
    }

    #[test]
    fn test_errors_map_to_uniform_unauthorized() {
        for err in [TokenError::Malformed, TokenError::InvalidSignature, TokenError::Expired] {
            match AppError::from(err) {
                AppError::Unauthorized(msg) => assert_eq!(msg, "invalid or expired token"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
