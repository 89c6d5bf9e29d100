//! Category routes
//!
//! Reads are public; mutations require the administrator tier.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use newsroom_db::{Category, NewCategory, UpdateCategory, repository::CategoryFilter};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, require};

use super::auth::RequireAdmin;
use super::types::{CreateNamedRequest, MessageResponse, NamedListQuery, UpdateNamedRequest};

/// GET /api/categorias
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<NamedListQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let filter = CategoryFilter {
        nombre: query.nombre,
        descripcion: query.descripcion,
        activo: query.activo,
    };
    let categories = state.db.list_categories(&filter).await?;
    Ok(Json(categories))
}

/// GET /api/categorias/{id}
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .db
        .get_category(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No existe la categoría con id {id}")))?;
    Ok(Json(category))
}

/// POST /api/categorias
async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateNamedRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(nombre) = require(&mut errors, "nombre", request.nombre.as_deref(), "El campo nombre es obligatorio")
    {
        check_length(&mut errors, "nombre", nombre, 2, 255);
    }
    errors.into_result()?;

    let category = state
        .db
        .insert_category(NewCategory {
            nombre: request.nombre.unwrap_or_default(),
            descripcion: request.descripcion.unwrap_or_default(),
            activo: request.activo.unwrap_or(true),
        })
        .await?;

    info!("Category {} created by {}", category.nombre, admin.username);
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categorias/{id}
async fn update_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNamedRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let changes = UpdateCategory {
        nombre: request.nombre,
        descripcion: request.descripcion,
        activo: request.activo,
    };
    let updated = state.db.update_category(id, changes).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("No existe la categoría con id {id}")));
    }

    info!("Category {} updated by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Categoría actualizada con éxito".to_string(),
    }))
}

/// DELETE /api/categorias/{id}
async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_category(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("No existe la categoría con id {id}")));
    }

    info!("Category {} deleted by {}", id, admin.username);
    Ok(Json(MessageResponse {
        message: "Categoría eliminada con éxito".to_string(),
    }))
}

/// Create category routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categorias", get(list_categories).post(create_category))
        .route(
            "/api/categorias/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}
