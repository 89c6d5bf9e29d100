//! Application state

use newsroom_auth::JwtManager;
use newsroom_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    /// Check email/username uniqueness before insert (422) instead of
    /// relying on the store's unique constraint
    pub precheck_unique: bool,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, precheck_unique: bool) -> Self {
        Self {
            db,
            jwt,
            precheck_unique,
        }
    }
}
