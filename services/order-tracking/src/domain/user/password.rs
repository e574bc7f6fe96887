//! 密码哈希

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use halcon_errors::AppError;
use thiserror::Error;

/// 明文密码最小长度
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort(_) => AppError::validation(err.to_string()),
            _ => AppError::internal(err.to_string()),
        }
    }
}

/// Argon2 PHC 格式的密码哈希
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        if plain_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(hash))
    }

    /// 从已存储的哈希构造
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    pub fn verify(&self, plain_password: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = HashedPassword::from_plain("admin123").unwrap();
        assert!(hashed.as_str().starts_with("$argon2"));
        assert!(hashed.verify("admin123").unwrap());
        assert!(!hashed.verify("admin124").unwrap());
    }

    #[test]
    fn test_salted() {
        let a = HashedPassword::from_plain("secret1").unwrap();
        let b = HashedPassword::from_plain("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_min_length() {
        assert!(matches!(
            HashedPassword::from_plain("12345"),
            Err(PasswordError::TooShort(6))
        ));
        assert!(HashedPassword::from_plain("123456").is_ok());
    }

    #[test]
    fn test_garbage_hash() {
        let hashed = HashedPassword::from_hash("not-a-phc-string".to_string());
        assert!(matches!(hashed.verify("x"), Err(PasswordError::InvalidHash(_))));
    }
}
