//! halcon-auth-core - 认证核心库
//!
//! 角色模型、会话令牌签发/校验、基于角色的访问控制决策

mod access;
mod role;
mod token;

pub use access::*;
pub use role::*;
pub use token::*;
