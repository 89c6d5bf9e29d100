//! Newsroom REST API
//!
//! This crate provides the Axum-based HTTP API for the Newsroom service:
//! the authentication endpoints plus the resource CRUD surface they guard.

pub mod error;
pub mod routes;
pub mod state;
pub mod validate;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
