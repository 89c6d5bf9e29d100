//! Authentication extractors and routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use newsroom_auth::{
    Action, AuthError, AuthUser, DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, extract_bearer_token,
    hash_password, verify_password,
};
use newsroom_db::{NewUser, User};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, is_valid_email, require};

use super::types::{LoginRequest, LoginResponse, RegisterRequest};

// ==================== Auth Extractors ====================

/// Extractor for any authenticated caller
///
/// Gate order: a missing or malformed Authorization header rejects with
/// 401 before verification; a header that is present but fails signature
/// or expiry checks rejects with 403. The identity attached on success is
/// the token snapshot; the live user record is not consulted.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = extract_bearer_token(auth_header)?;
        let claims = app_state.jwt.validate_token(token)?;
        let user = AuthUser::from_claims(&claims)?;

        debug!("Authenticated user: {} (perfil {})", user.username, user.perfil_id);
        Ok(RequireAuth(user))
    }
}

/// Extractor for administrator callers
///
/// Same gate as [`RequireAuth`], plus the embedded role reference must be
/// the administrator tier; any other tier on a valid token is 403.
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        let allowed = user
            .tier()
            .is_some_and(|tier| tier.allows(Action::Administer));
        if !allowed {
            return Err(AuthError::InsufficientPermissions.into());
        }

        Ok(RequireAdmin(user))
    }
}

// ==================== Input Validation ====================

fn validate_login(request: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(email) = require(&mut errors, "email", request.email.as_deref(), "El campo email es requerido")
        && !is_valid_email(email)
    {
        errors.add("email", "El campo email debe ser un correo válido");
    }
    require(&mut errors, "password", request.password.as_deref(), "El campo password es requerido");
    errors.into_result()
}

async fn validate_register(state: &AppState, request: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if let Some(nick) = require(&mut errors, "nick", request.nick.as_deref(), "El campo nick es obligatorio") {
        check_length(&mut errors, "nick", nick, 2, 20);
    }
    if let Some(email) = require(&mut errors, "email", request.email.as_deref(), "El campo email es obligatorio") {
        if !is_valid_email(email) {
            errors.add("email", "El campo email debe ser un correo válido");
        }
        check_length(&mut errors, "email", email, 2, 255);
    }
    if let Some(password) =
        require(&mut errors, "password", request.password.as_deref(), "El campo password es obligatorio")
    {
        check_length(&mut errors, "password", password, 8, 255);
    }

    // Uniqueness pre-check, when enabled, answers with a field error
    // instead of letting the store's unique constraint surface later
    if state.precheck_unique && errors.is_empty() {
        if let Some(email) = request.email.as_deref()
            && state.db.get_user_by_email(email).await?.is_some()
        {
            errors.add("email", "Ya existe un usuario con este email");
        }
        if let Some(nick) = request.nick.as_deref()
            && state.db.get_user_by_username(nick).await?.is_some()
        {
            errors.add("nick", "Ya existe un usuario con este nick");
        }
    }

    errors.into_result()
}

// ==================== Auth Routes ====================

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_login(&request)?;
    let email = request.email.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    debug!("Login attempt for email: {}", email);

    // Unknown email, wrong password and inactive account all collapse
    // into the same undifferentiated 401
    let user = match state.db.get_active_user_by_email(email).await? {
        Some(user) if verify_password(password, &user.password_hash)? => user,
        _ => return Err(ApiError::Unauthorized),
    };

    let token = state.jwt.generate_token(&user)?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(LoginResponse {
        message: "Login con éxito".to_string(),
        token,
    }))
}

/// POST /api/auth/registro
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_register(&state, &request).await?;

    let perfil_id = request.perfil_id.unwrap_or(DEFAULT_PROFILE_ID);

    // Lazily provision the referenced profile; a concurrent loser of the
    // creation race is absorbed inside ensure_profile
    state.db.ensure_profile(perfil_id, DEFAULT_PROFILE_NAME).await?;

    // Validation has already rejected missing fields
    let username = request.nick.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let password_hash = hash_password(&password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username,
            email,
            password_hash,
            perfil_id,
            activo: true,
        })
        .await?;

    info!("Registered user {} with perfil {}", user.username, user.perfil_id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/registro", post(register))
}
