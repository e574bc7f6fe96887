//! Halcon 订单追踪服务入口

use std::sync::Arc;

use halcon_bootstrap::{Infrastructure, MetricsRecorder};
use halcon_errors::AppResult;
use order_tracking::api::http::{AppState, HttpConfig, build_router};
use order_tracking::application::{
    AuthService, OrderService, TrackingService, UserService, seed_admin,
};
use order_tracking::domain::order::OrderRepository;
use order_tracking::domain::user::UserRepository;
use order_tracking::infrastructure::persistence::{
    PostgresOrderRepository, PostgresUserRepository, run_migrations,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    halcon_bootstrap::run(&config_dir, build_app).await
}

async fn build_app(infra: Infrastructure, metrics: MetricsRecorder) -> AppResult<axum::Router> {
    let pool = infra.postgres_pool();
    let migrated = run_migrations(pool.clone()).await?;
    info!(applied = ?migrated.applied, "Database schema up to date");

    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let orders: Arc<dyn OrderRepository> = Arc::new(PostgresOrderRepository::new(pool));

    seed_admin(users.as_ref(), &infra.config().seed).await?;

    let state = AppState {
        orders: Arc::new(OrderService::new(
            orders.clone(),
            users.clone(),
            infra.blob_store(),
            infra.upload_policy(),
        )),
        users: Arc::new(UserService::new(users.clone())),
        auth: Arc::new(AuthService::new(users, infra.token_service())),
        tracking: Arc::new(TrackingService::new(orders)),
        tokens: infra.token_service(),
        metrics: Some(metrics),
    };

    info!("Order tracking service initialized");
    Ok(build_router(state, &HttpConfig::from_app_config(infra.config())))
}
