//! 请求处理器

pub mod auth;
pub mod health;
pub mod orders;
pub mod tracking;
pub mod users;

use serde::Serialize;

/// 删除类操作的响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
