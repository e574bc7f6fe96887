//! 用户管理服务（仅 Admin）

use std::sync::Arc;

use halcon_auth_core::{Identity, Operation, Role};
use halcon_common::{UserId, utils::non_empty};
use halcon_errors::{AppError, AppResult};
use serde::Deserialize;
use tracing::info;

use super::access::authorize;
use crate::domain::user::{HashedPassword, User, UserRepository, UserView};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserCommand {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

/// 部分更新，`is_active` 区分缺省与显式 false
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserCommand {
    pub password: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list(&self, identity: &Identity) -> AppResult<Vec<UserView>> {
        authorize(identity, Operation::ListUsers)?;

        let users = self.users.list().await?;
        Ok(users.iter().map(UserView::from).collect())
    }

    pub async fn get(&self, identity: &Identity, id: UserId) -> AppResult<UserView> {
        authorize(identity, Operation::ViewUser)?;

        let user = self.load(id).await?;
        Ok(UserView::from(&user))
    }

    pub async fn create(&self, identity: &Identity, cmd: CreateUserCommand) -> AppResult<UserView> {
        authorize(identity, Operation::CreateUser)?;

        let username = non_empty(Some(&cmd.username))
            .ok_or_else(|| AppError::validation("username is required"))?
            .to_string();
        let role = cmd.role.ok_or_else(|| AppError::validation("role is required"))?;
        let password_hash = HashedPassword::from_plain(&cmd.password)?;

        if self.users.exists_by_username(&username).await? {
            return Err(AppError::conflict("username already exists"));
        }

        let user = User::new(username, password_hash, role, Some(identity.user_id))
            .with_profile(&cmd.department, &cmd.full_name, &cmd.email);
        self.users.create(&user).await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(UserView::from(&user))
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: UserId,
        cmd: UpdateUserCommand,
    ) -> AppResult<UserView> {
        authorize(identity, Operation::UpdateUser)?;

        let mut user = self.load(id).await?;

        if let Some(password) = non_empty(cmd.password.as_deref()) {
            user.password_hash = HashedPassword::from_plain(password)?;
        }
        if let Some(role) = cmd.role {
            user.role = role;
        }
        if let Some(department) = non_empty(cmd.department.as_deref()) {
            user.department = department.to_string();
        }
        if let Some(full_name) = non_empty(cmd.full_name.as_deref()) {
            user.full_name = full_name.to_string();
        }
        if let Some(email) = non_empty(cmd.email.as_deref()) {
            user.email = email.to_string();
        }
        if let Some(is_active) = cmd.is_active {
            user.is_active = is_active;
        }
        user.audit.update(Some(identity.user_id));

        self.users.update(&user).await?;
        info!(user_id = %user.id, updated_by = %identity.user_id, "User updated");
        Ok(UserView::from(&user))
    }

    /// 软删除，记录保留用于订单审计
    pub async fn delete(&self, identity: &Identity, id: UserId) -> AppResult<()> {
        authorize(identity, Operation::DeleteUser)?;

        let mut user = self.load(id).await?;
        user.soft_delete(identity.user_id);
        self.users.update(&user).await?;

        info!(user_id = %user.id, deleted_by = %identity.user_id, "User soft-deleted");
        Ok(())
    }

    async fn load(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}
