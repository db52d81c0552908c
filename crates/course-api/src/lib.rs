//! Course Registry REST API
//!
//! This crate provides the Axum-based HTTP API: account registration and
//! login, the user-facing course catalog, and the administrator course
//! management routes.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
