//! 订单聚合

mod order;
mod repository;
mod state_machine;
mod status;

pub use order::*;
pub use repository::*;
pub use state_machine::*;
pub use status::*;
