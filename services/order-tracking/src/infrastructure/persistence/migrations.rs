//! 内嵌的数据库迁移

use halcon_adapter_postgres::{Migration, MigrationManager, MigrationResult};
use halcon_errors::AppResult;
use sqlx::PgPool;

/// 按版本排列的迁移
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_users",
            include_str!("../../../migrations/001_create_users.sql"),
        ),
        Migration::new(
            2,
            "create_orders",
            include_str!("../../../migrations/002_create_orders.sql"),
        ),
    ]
}

/// 启动时执行迁移
pub async fn run_migrations(pool: PgPool) -> AppResult<MigrationResult> {
    MigrationManager::new(pool).migrate(&migrations()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_unique_and_ordered() {
        let versions: Vec<i64> = migrations().iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2]);
    }
}
