//! PostgreSQL 持久化

mod migrations;
mod order_repository;
mod user_repository;

pub use migrations::*;
pub use order_repository::*;
pub use user_repository::*;
