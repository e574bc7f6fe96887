//! 用户仓储接口

use async_trait::async_trait;
use halcon_auth_core::Role;
use halcon_common::UserId;
use halcon_errors::AppResult;

use super::User;

/// 用户仓储接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，用户名重复时返回 Conflict
    async fn create(&self, user: &User) -> AppResult<()>;

    async fn update(&self, user: &User) -> AppResult<()>;

    /// 未删除的用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 启用且未删除的用户
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// 批量查找，包含已删除用户（用于订单审计信息）
    async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>>;

    /// 未删除的用户，按创建时间排序
    async fn list(&self) -> AppResult<Vec<User>>;

    /// 用户名是否已占用（包括已删除用户）
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// 是否存在该角色的未删除用户
    async fn exists_with_role(&self, role: Role) -> AppResult<bool>;
}
