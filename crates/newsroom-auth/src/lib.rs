//! Newsroom Authentication and Authorization
//!
//! This crate provides JWT-based authentication and role-tier
//! access control for the Newsroom API.

pub mod error;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod role;

pub use error::AuthError;
pub use identity::{AuthUser, extract_bearer_token};
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
pub use role::{Action, DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, RoleTier};
