//! 领域层

pub mod order;
pub mod user;
