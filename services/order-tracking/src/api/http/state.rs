//! 路由共享状态

use std::sync::Arc;

use halcon_auth_core::TokenService;
use halcon_bootstrap::MetricsRecorder;

use crate::application::{AuthService, OrderService, TrackingService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    pub tracking: Arc<TrackingService>,
    pub tokens: Arc<TokenService>,
    /// 未安装 recorder 时 `/metrics` 返回 404
    pub metrics: Option<MetricsRecorder>,
}
