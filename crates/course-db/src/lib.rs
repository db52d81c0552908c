//! Course Registry Database Layer
//!
//! This crate provides the datastore for the course registry: user
//! credential records and the course catalog, persisted in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
