//! HTTP API（axum）

mod extract;
mod handlers;
mod middleware;
mod router;
mod state;

pub use extract::*;
pub use middleware::*;
pub use router::*;
pub use state::*;
