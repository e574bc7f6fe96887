//! 初始管理员

use halcon_auth_core::Role;
use halcon_config::SeedConfig;
use halcon_errors::AppResult;
use secrecy::ExposeSecret;
use tracing::info;

use crate::domain::user::{HashedPassword, User, UserRepository};

/// 不存在 Admin 时创建配置中的管理员账号
///
/// 返回是否创建了新账号
pub async fn seed_admin(users: &dyn UserRepository, config: &SeedConfig) -> AppResult<bool> {
    if !config.enabled {
        return Ok(false);
    }
    if users.exists_with_role(Role::Admin).await? {
        info!("Admin user already exists, skipping seed");
        return Ok(false);
    }

    let password_hash = HashedPassword::from_plain(config.admin_password.expose_secret())?;
    let admin = User::new(config.admin_username.clone(), password_hash, Role::Admin, None)
        .with_profile("Administration", "System Administrator", "admin@halcon.com");
    users.create(&admin).await?;

    info!(username = %admin.username, "Default admin user created");
    Ok(true)
}
