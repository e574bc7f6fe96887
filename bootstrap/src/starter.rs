//! 服务启动器
//!
//! HTTP 服务的统一入口

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use halcon_config::AppConfig;
use halcon_errors::AppResult;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::observability::MetricsRecorder;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 加载配置、初始化日志与指标、创建基础设施，
/// 由 `app_builder` 构建路由后启动服务器并等待关闭信号。
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     halcon_bootstrap::run("config", |infra, metrics| async move {
///         Ok(build_router(infra, metrics))
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(config_dir: &str, app_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, MetricsRecorder) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = MetricsRecorder::install()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let infra = Infrastructure::from_config(config).await?;
    let app = app_builder(infra, metrics).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}
