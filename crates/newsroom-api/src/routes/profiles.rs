//! Profile routes
//!
//! Profile reads expose the role catalogue and require the administrator
//! tier; mutations are left open, matching the published surface of the
//! service.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use newsroom_db::Profile;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, require};

use super::auth::RequireAdmin;
use super::types::{MessageResponse, ProfileRequest};

/// GET /api/perfiles
async fn list_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.db.list_profiles().await?;
    Ok(Json(profiles))
}

/// GET /api/perfiles/{id}
async fn get_profile(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .db
        .get_profile(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No existe el perfil con id {id}")))?;
    Ok(Json(profile))
}

/// POST /api/perfiles
async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(nombre) = require(&mut errors, "nombre", request.nombre.as_deref(), "El campo nombre es obligatorio")
    {
        check_length(&mut errors, "nombre", nombre, 2, 255);
    }
    errors.into_result()?;

    let profile = state
        .db
        .insert_profile(request.id, request.nombre.as_deref().unwrap_or_default())
        .await?;

    info!("Profile {} ({}) created", profile.nombre, profile.id);
    Ok((StatusCode::CREATED, Json(profile)))
}

/// PUT /api/perfiles/{id}
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "nombre", request.nombre.as_deref(), "El campo nombre es obligatorio");
    errors.into_result()?;

    let updated = state
        .db
        .update_profile(id, request.nombre.as_deref().unwrap_or_default())
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!("No existe el perfil con id {id}")));
    }

    info!("Profile {} updated", id);
    Ok(Json(MessageResponse {
        message: "Perfil actualizado con éxito".to_string(),
    }))
}

/// DELETE /api/perfiles/{id}
async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_profile(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("No existe el perfil con id {id}")));
    }

    info!("Profile {} deleted", id);
    Ok(Json(MessageResponse {
        message: "Perfil eliminado con éxito".to_string(),
    }))
}

/// Create profile routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/perfiles", get(list_profiles).post(create_profile))
        .route(
            "/api/perfiles/{id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}
