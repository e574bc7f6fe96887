//! PostgreSQL 用户仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halcon_adapter_postgres::map_sqlx_error;
use halcon_auth_core::Role;
use halcon_common::{AuditInfo, UserId};
use halcon_errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::{HashedPassword, User, UserRepository};

const USER_COLUMNS: &str = r#"
    id, username, password_hash, role, department, full_name, email, is_active, deleted_at,
    created_at, created_by, updated_at, updated_by
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, condition: &str, value: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, condition);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find user", e))?;

        row.map(UserRow::into_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, department, full_name, email,
                               is_active, deleted_at, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.id.0)
        .bind(&user.username)
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(&user.department)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.deleted_at)
        .bind(user.audit.created_at)
        .bind(user.audit.created_by.map(|u| u.0))
        .bind(user.audit.updated_at)
        .bind(user.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create user", e))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, role = $3, department = $4, full_name = $5, email = $6,
                is_active = $7, deleted_at = $8, updated_at = $9, updated_by = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(&user.department)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.deleted_at)
        .bind(user.audit.updated_at)
        .bind(user.audit.updated_by.map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update user", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find user", e))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.fetch_one_where(
            "username = $1 AND is_active = TRUE AND deleted_at IS NULL",
            username,
        )
        .await
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find users", e))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL ORDER BY created_at ASC",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list users", e))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check username", e))?;

        Ok(row.0)
    }

    async fn exists_with_role(&self, role: Role) -> AppResult<bool> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = $1 AND deleted_at IS NULL)",
        )
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("check role", e))?;

        Ok(row.0)
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    department: String,
    full_name: String,
    email: String,
    is_active: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| AppError::database(format!("Invalid user role: {}", self.role)))?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            username: self.username,
            password_hash: HashedPassword::from_hash(self.password_hash),
            role,
            department: self.department,
            full_name: self.full_name,
            email: self.email,
            is_active: self.is_active,
            deleted_at: self.deleted_at,
            audit: AuditInfo {
                created_at: self.created_at,
                created_by: self.created_by.map(UserId::from_uuid),
                updated_at: self.updated_at,
                updated_by: self.updated_by.map(UserId::from_uuid),
            },
        })
    }
}
