//! User administration routes
//!
//! The whole surface requires the administrator tier.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use newsroom_auth::{DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, hash_password};
use newsroom_db::{NewUser, UpdateUser, User, UserDetail, repository::UserFilter};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, is_valid_email, require};

use super::auth::RequireAdmin;
use super::types::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserListQuery};

fn validate_create(request: &CreateUserRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(username) =
        require(&mut errors, "username", request.username.as_deref(), "El campo username es obligatorio")
    {
        check_length(&mut errors, "username", username, 2, 20);
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
    errors.into_result()
}

/// GET /api/usuarios
async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserDetail>>, ApiError> {
    let filter = UserFilter {
        username: query.username,
        email: query.email,
        perfil_id: query.perfil_id,
        activo: query.activo,
    };
    let users = state.db.list_users(&filter).await?;
    Ok(Json(users))
}

/// GET /api/usuarios/{id}
async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDetail>, ApiError> {
    let user = state
        .db
        .get_user_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No existe el usuario con id {id}")))?;
    Ok(Json(user))
}

/// POST /api/usuarios
async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_create(&request)?;

    let perfil_id = request.perfil_id.unwrap_or(DEFAULT_PROFILE_ID);
    state.db.ensure_profile(perfil_id, DEFAULT_PROFILE_NAME).await?;

    let password_hash = hash_password(request.password.as_deref().unwrap_or_default())?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password_hash,
            perfil_id,
            activo: request.activo.unwrap_or(true),
        })
        .await?;

    info!("User {} created by {}", user.username, admin.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/usuarios/{id}
async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(username) = request.username.as_deref() {
        check_length(&mut errors, "username", username, 2, 20);
    }
    if let Some(email) = request.email.as_deref()
        && !is_valid_email(email)
    {
        errors.add("email", "El campo email debe ser un correo válido");
    }
    if let Some(password) = request.password.as_deref() {
        check_length(&mut errors, "password", password, 8, 255);
    }
    errors.into_result()?;

    if let Some(perfil_id) = request.perfil_id {
        state.db.ensure_profile(perfil_id, DEFAULT_PROFILE_NAME).await?;
    }

    let password_hash = request.password.as_deref().map(hash_password).transpose()?;

    let changes = UpdateUser {
        username: request.username,
        email: request.email,
        password_hash,
        perfil_id: request.perfil_id,
        activo: request.activo,
    };
    let updated = state.db.update_user(id, changes).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("No existe el usuario con id {id}")));
    }

    info!("User {} updated by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Usuario actualizado con éxito".to_string(),
    }))
}

/// DELETE /api/usuarios/{id}
async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_user(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("No existe el usuario con id {id}")));
    }

    info!("User {} deleted by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Usuario eliminado con éxito".to_string(),
    }))
}

/// Create user administration routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/usuarios", get(list_users).post(create_user))
        .route(
            "/api/usuarios/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
