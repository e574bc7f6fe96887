//! halcon-bootstrap - 服务启动骨架
//!
//! 运行时初始化、基础设施装配、指标与优雅关闭

mod infrastructure;
mod observability;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use observability::*;
pub use runtime::*;
pub use starter::*;
