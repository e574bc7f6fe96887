//! 应用层
//!
//! 每个用例按 认证身份 → 授权 → 加载 → 状态机 → 变更 → 持久化 的顺序执行

mod access;
mod auth_service;
mod order_service;
mod seed;
mod tracking_service;
mod user_service;

pub use auth_service::*;
pub use order_service::*;
pub use seed::*;
pub use tracking_service::*;
pub use user_service::*;
