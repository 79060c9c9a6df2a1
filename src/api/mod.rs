//! HTTP API and single-page UI hosting

pub mod catalog;
pub mod health;
pub mod middleware;
pub mod router;
pub mod sessions;
pub mod state;
pub mod types;

pub use router::{api_router, create_router};
pub use state::AppState;
