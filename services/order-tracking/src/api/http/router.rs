//! 路由装配

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use halcon_config::AppConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{auth, health, orders, tracking, users};
use super::{AppState, auth_middleware};

/// multipart 编码开销的余量
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// HTTP 层配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub allowed_origins: Vec<String>,
    pub upload_dir: String,
    pub public_path: String,
    pub max_upload_size: usize,
}

impl HttpConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            allowed_origins: config.cors.allowed_origins.clone(),
            upload_dir: config.upload.dir.clone(),
            public_path: config.upload.public_path.clone(),
            max_upload_size: usize::try_from(config.upload.max_size).unwrap_or(usize::MAX),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            upload_dir: "./uploads".to_string(),
            public_path: "/uploads".to_string(),
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

/// 构建完整路由
///
/// 受保护路由经过 `auth_middleware`；公开路由与静态证据文件无需认证
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    let evidence_limit = config.max_upload_size.saturating_add(MULTIPART_OVERHEAD);

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/orders", get(orders::list).post(orders::create))
        .route(
            "/api/orders/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/api/orders/{id}/restore", post(orders::restore))
        .route(
            "/api/orders/{id}/evidence",
            post(orders::upload_evidence).layer(DefaultBodyLimit::max(evidence_limit)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/track",
            get(tracking::track_by_query).post(tracking::track_by_body),
        );

    let mut app = public.merge(protected);
    if config.public_path.len() > 1 && config.public_path.starts_with('/') {
        app = app.nest_service(&config.public_path, ServeDir::new(&config.upload_dir));
    } else {
        warn!(public_path = %config.public_path, "Invalid upload public path, static files disabled");
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
