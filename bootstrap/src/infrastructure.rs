//! 基础设施资源管理
//!
//! 由配置统一构建数据库连接池、令牌服务和证据存储

use std::sync::Arc;

use chrono::Duration;
use halcon_adapter_local_storage::LocalBlobStore;
use halcon_adapter_postgres::{PostgresConfig, check_connection, create_pool};
use halcon_auth_core::TokenService;
use halcon_common::{RetryConfig, is_retryable_error, with_conditional_retry};
use halcon_config::AppConfig;
use halcon_errors::{AppError, AppResult};
use halcon_ports::{BlobStore, UploadPolicy};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// 基础设施资源容器
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
    blob_store: Arc<LocalBlobStore>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 数据库连接只对连接类错误重试，认证失败等立即返回
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_conditional_retry(
            &retry_config,
            "PostgreSQL connection",
            || {
                let cfg = pg_config.clone();
                async move {
                    let pool = create_pool(&cfg).await?;
                    check_connection(&pool).await?;
                    Ok::<_, AppError>(pool)
                }
            },
            |e| is_retryable_error(&e.to_string()),
        )
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            Duration::hours(config.jwt.expires_in_hours),
            config.jwt.issuer.clone(),
        ));

        let blob_store =
            Arc::new(LocalBlobStore::new(&config.upload.dir, config.upload.public_path.clone()).await?);
        info!(dir = %config.upload.dir, "Evidence storage ready");

        Ok(Self {
            config,
            postgres_pool,
            token_service,
            blob_store,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        self.blob_store.clone()
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(
            self.config.upload.max_size,
            self.config.upload.allowed_extensions.clone(),
        )
    }
}
