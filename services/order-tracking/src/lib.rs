//! Halcon 订单追踪服务
//!
//! 基于角色的订单生命周期管理与公开追踪查询

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
