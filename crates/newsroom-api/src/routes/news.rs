//! News article routes
//!
//! Reads are public; mutations accept any authenticated caller.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use newsroom_db::{NewNewsArticle, NewsArticle, NewsDetail, UpdateNewsArticle, repository::NewsFilter};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{FieldErrors, check_length, require};

use super::auth::RequireAuth;
use super::types::{CreateNewsRequest, MessageResponse, NewsListQuery, UpdateNewsRequest};

fn validate_create(request: &CreateNewsRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(titulo) = require(&mut errors, "titulo", request.titulo.as_deref(), "El campo titulo es obligatorio")
    {
        check_length(&mut errors, "titulo", titulo, 2, 255);
    }
    if request.categoria_id.is_none() {
        errors.add("categoria_id", "El campo categoria_id es obligatorio");
    }
    if request.estado_id.is_none() {
        errors.add("estado_id", "El campo estado_id es obligatorio");
    }
    errors.into_result()
}

/// GET /api/noticias
async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsListQuery>,
) -> Result<Json<Vec<NewsDetail>>, ApiError> {
    let filter = NewsFilter {
        categoria_id: query.categoria_id,
        estado_id: query.estado_id,
        usuario_id: query.usuario_id,
        activo: query.activo,
    };
    let articles = state.db.list_news(&filter).await?;
    Ok(Json(articles))
}

/// GET /api/noticias/{id}
async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NewsDetail>, ApiError> {
    let article = state
        .db
        .get_news_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No existe la noticia con id {id}")))?;
    Ok(Json(article))
}

/// POST /api/noticias
async fn create_news(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> Result<(StatusCode, Json<NewsArticle>), ApiError> {
    validate_create(&request)?;

    // The author defaults to the caller embedded in the token
    let usuario_id = request.usuario_id.unwrap_or(caller.id);

    let article = state
        .db
        .insert_news(NewNewsArticle {
            categoria_id: request.categoria_id.unwrap_or_default(),
            estado_id: request.estado_id.unwrap_or_default(),
            usuario_id,
            titulo: request.titulo.unwrap_or_default(),
            fecha_publicacion: request.fecha_publicacion.unwrap_or_else(Utc::now),
            descripcion: request.descripcion.unwrap_or_default(),
            imagen: request.imagen.unwrap_or_default(),
            activo: request.activo.unwrap_or(true),
        })
        .await?;

    info!("Article '{}' created by {}", article.titulo, caller.username);
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/noticias/{id}
async fn update_news(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNewsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(titulo) = request.titulo.as_deref() {
        check_length(&mut errors, "titulo", titulo, 2, 255);
    }
    errors.into_result()?;

    let changes = UpdateNewsArticle {
        categoria_id: request.categoria_id,
        estado_id: request.estado_id,
        usuario_id: request.usuario_id,
        titulo: request.titulo,
        fecha_publicacion: request.fecha_publicacion,
        descripcion: request.descripcion,
        imagen: request.imagen,
        activo: request.activo,
    };
    let updated = state.db.update_news(id, changes).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("No existe la noticia con id {id}")));
    }

    info!("Article {} updated by {}", id, caller.username);
    Ok(Json(MessageResponse {
        message: "Noticia actualizada con éxito".to_string(),
    }))
}

/// DELETE /api/noticias/{id}
async fn delete_news(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.db.delete_news(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("No existe la noticia con id {id}")));
    }

    info!("Article {} deleted by {}", id, caller.username);
    Ok(Json(MessageResponse {
        message: "Noticia eliminada con éxito".to_string(),
    }))
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/noticias", get(list_news).post(create_news))
        .route(
            "/api/noticias/{id}",
            get(get_news).put(update_news).delete(delete_news),
        )
}
