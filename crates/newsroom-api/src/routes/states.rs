//! Publication state routes
//!
//! Reads are public; mutations require the administrator tier.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use newsroom_db::{NewNewsState, NewsState, UpdateNewsState, repository::StateFilter};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, require};

use super::auth::RequireAdmin;
use super::types::{CreateNamedRequest, MessageResponse, NamedListQuery, UpdateNamedRequest};

/// GET /api/estados
async fn list_states(
    State(state): State<AppState>,
    Query(query): Query<NamedListQuery>,
) -> Result<Json<Vec<NewsState>>, ApiError> {
    let filter = StateFilter {
        nombre: query.nombre,
        descripcion: query.descripcion,
        activo: query.activo,
    };
    let states = state.db.list_states(&filter).await?;
    Ok(Json(states))
}

/// GET /api/estados/{id}
async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NewsState>, ApiError> {
    let record = state
        .db
        .get_state(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No existe el estado con id {id}")))?;
    Ok(Json(record))
}

/// POST /api/estados
async fn create_state(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateNamedRequest>,
) -> Result<(StatusCode, Json<NewsState>), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(nombre) = require(&mut errors, "nombre", request.nombre.as_deref(), "El campo nombre es obligatorio")
    {
        check_length(&mut errors, "nombre", nombre, 2, 255);
    }
    errors.into_result()?;

    let record = state
        .db
        .insert_state(NewNewsState {
            nombre: request.nombre.unwrap_or_default(),
            descripcion: request.descripcion.unwrap_or_default(),
            activo: request.activo.unwrap_or(true),
        })
        .await?;

    info!("State {} created by {}", record.nombre, admin.username);
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/estados/{id}
async fn update_state(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNamedRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let changes = UpdateNewsState {
        nombre: request.nombre,
        descripcion: request.descripcion,
        activo: request.activo,
    };
    let updated = state.db.update_state(id, changes).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("No existe el estado con id {id}")));
    }

    info!("State {} updated by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Estado actualizado con éxito".to_string(),
    }))
}

/// DELETE /api/estados/{id}
async fn delete_state(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_state(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("No existe el estado con id {id}")));
    }

    info!("State {} deleted by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Estado eliminado con éxito".to_string(),
    }))
}

/// Create publication state routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/estados", get(list_states).post(create_state))
        .route(
            "/api/estados/{id}",
            get(get_state).put(update_state).delete(delete_state),
        )
}
