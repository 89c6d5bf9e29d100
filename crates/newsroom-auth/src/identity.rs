//! Authenticated identity attached to requests

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::jwt::Claims;
use crate::role::RoleTier;

/// Identity snapshot carried by a validated token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub perfil_id: i64,
    pub username: String,
    pub email: String,
}

impl AuthUser {
    /// Create from JWT claims
    ///
    /// A subject that does not parse as a user id means the token was not
    /// minted here; the whole credential is rejected.
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            id,
            perfil_id: claims.perfil_id,
            username: claims.username.clone(),
            email: claims.email.clone(),
        })
    }

    /// Known role tier for this identity, if the profile id maps to one
    pub fn tier(&self) -> Option<RoleTier> {
        RoleTier::from_id(self.perfil_id)
    }

    /// Whether the embedded role reference is the administrator tier
    pub fn is_admin(&self) -> bool {
        self.tier().is_some_and(RoleTier::is_admin)
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    if !header.starts_with("Bearer ") {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(&header[7..])
}
