//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// HTTP status and user-facing message for this error
    ///
    /// A missing or malformed credential is 401; a credential that was
    /// presented but failed verification (bad signature, expired, wrong
    /// tier) is 403.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Sin autorización"),
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "No se proporcionó un token con el formato correcto",
            ),
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::Jwt(_) => {
                (StatusCode::FORBIDDEN, "Token inválido o expirado")
            }
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Sin autorización de Administrador")
            }
            AuthError::PasswordHash(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_is_unauthorized() {
        let (status, _) = AuthError::MissingAuthHeader.status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bad_token_is_forbidden() {
        for err in [AuthError::InvalidToken, AuthError::TokenExpired] {
            let (status, message) = err.status_and_message();
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(message, "Token inválido o expirado");
        }
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let (status, message) = AuthError::InsufficientPermissions.status_and_message();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "Sin autorización de Administrador");
    }
}
