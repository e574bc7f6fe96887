//! ports - 抽象 trait 层
//!
//! 定义核心依赖的外部基础设施接口

mod blob_store;

pub use blob_store::*;
