//! 指标模块
//!
//! Prometheus 导出与业务计数器

use halcon_errors::{AppError, AppResult};
use halcon_telemetry::init_metrics;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;

/// Metrics 记录器
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 Prometheus recorder，每个进程只能调用一次
    pub fn install() -> AppResult<Self> {
        let handle = init_metrics().map_err(|e| AppError::internal(e.to_string()))?;
        Ok(Self { handle })
    }

    /// Prometheus 文本格式
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 记录授权决策
pub fn record_authorization_decision(operation: &str, allowed: bool) {
    let labels = [
        ("operation", operation.to_string()),
        ("allowed", allowed.to_string()),
    ];

    counter!("authorization_decisions_total", &labels).increment(1);
}

/// 记录订单状态迁移
pub fn record_order_transition(from: &str, to: &str, role: &str) {
    let labels = [
        ("from", from.to_string()),
        ("to", to.to_string()),
        ("role", role.to_string()),
    ];

    counter!("order_transitions_total", &labels).increment(1);
}

/// 记录登录尝试，outcome 为 success / failure
pub fn record_login_attempt(outcome: &str) {
    counter!("login_attempts_total", "outcome" => outcome.to_string()).increment(1);
}
