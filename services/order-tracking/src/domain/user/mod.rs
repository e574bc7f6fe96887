//! 用户（身份）聚合

mod password;
mod repository;
mod user;

pub use password::*;
pub use repository::*;
pub use user::*;
