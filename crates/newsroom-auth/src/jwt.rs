//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use newsroom_db::User;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// JWT claims
///
/// The payload carries the snapshot of the user selected at issuance:
/// id, role reference, display handle and email. It is not re-checked
/// against the live record while the token is valid.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role reference (profile id) at issuance time
    pub perfil_id: i64,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT manager for token generation and validation
///
/// Holds the signing secret injected at process start; nothing else in
/// the process may own it.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Generate a JWT token embedding the given user's public fields
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            perfil_id: user.perfil_id,
            username: user.username.clone(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Generating token for user: {}", user.username);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        // Check expiration
        let now = Utc::now().timestamp();
        if token_data.claims.exp < now {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_db::utils::sentinel_date;

    fn sample_user(id: i64, perfil_id: i64) -> User {
        User {
            id,
            username: "testuser".to_string(),
            email: "test@x.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            perfil_id,
            activo: true,
            user_alta: "Admin".to_string(),
            fecha_alta: sentinel_date(),
            user_mod: String::new(),
            fecha_mod: sentinel_date(),
            user_baja: String::new(),
            fecha_baja: sentinel_date(),
        }
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = JwtManager::new("test-secret-key", 24);

        let token = manager.generate_token(&sample_user(1, 2)).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.perfil_id, 2);
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.email, "test@x.com");
    }

    #[test]
    fn test_role_claim_matches_stored_role() {
        let manager = JwtManager::new("test-secret-key", 24);

        for perfil_id in [1, 2, 9] {
            let token = manager.generate_token(&sample_user(7, perfil_id)).unwrap();
            let claims = manager.validate_token(&token).unwrap();
            assert_eq!(claims.perfil_id, perfil_id);
        }
    }

    #[test]
    fn test_expiry_window_is_24_hours() {
        let manager = JwtManager::new("test-secret-key", 24);
        let token = manager.generate_token(&sample_user(1, 2)).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative expiry puts `exp` in the past at issuance
        let manager = JwtManager::new("test-secret-key", -1);
        let token = manager.generate_token(&sample_user(1, 2)).unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new("test-secret-key", 24);

        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-a", 24);
        let verifier = JwtManager::new("secret-b", 24);

        let token = issuer.generate_token(&sample_user(1, 1)).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
