//! 用户实体

use chrono::{DateTime, Utc};
use halcon_auth_core::{Identity, Role};
use halcon_common::{AuditInfo, UserId};
use serde::Serialize;

use super::HashedPassword;

/// 系统用户
///
/// 从不物理删除：软删除时记录 `deleted_at` 并停用
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub department: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub audit: AuditInfo,
}

impl User {
    pub fn new(
        username: String,
        password_hash: HashedPassword,
        role: Role,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash,
            role,
            department: String::new(),
            full_name: String::new(),
            email: String::new(),
            is_active: true,
            deleted_at: None,
            audit: AuditInfo::new(created_by),
        }
    }

    pub fn with_profile(mut self, department: &str, full_name: &str, email: &str) -> Self {
        self.department = department.trim().to_string();
        self.full_name = full_name.trim().to_string();
        self.email = email.trim().to_string();
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 能否登录
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted()
    }

    pub fn soft_delete(&mut self, by: UserId) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
        self.audit.update(Some(by));
    }

    /// 签发令牌时使用的身份快照
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.username.clone(), self.role)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            full_name: self.full_name.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            department: self.department.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// 订单响应中的创建人/修改人摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

/// 当前用户资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub department: String,
    pub full_name: String,
    pub email: String,
}

/// 管理端用户视图，不含密码哈希
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub department: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            department: user.department.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            created_at: user.audit.created_at,
            updated_at: user.audit.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "route1".to_string(),
            HashedPassword::from_hash("$argon2id$stub".to_string()),
            Role::Route,
            None,
        )
        .with_profile("Logistics", " Rita Route ", "rita@halcon.com")
    }

    #[test]
    fn test_new_user_is_active() {
        let user = user();
        assert!(user.can_login());
        assert_eq!(user.full_name, "Rita Route");
    }

    #[test]
    fn test_soft_delete_deactivates() {
        let mut user = user();
        let admin = UserId::new();
        user.soft_delete(admin);

        assert!(user.is_deleted());
        assert!(!user.is_active);
        assert!(!user.can_login());
        assert_eq!(user.audit.updated_by, Some(admin));
    }

    #[test]
    fn test_identity_snapshot() {
        let user = user();
        let identity = user.identity();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::Route);
    }
}
