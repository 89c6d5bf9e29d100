//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] newsroom_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] newsroom_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound(msg) => message_response(StatusCode::NOT_FOUND, &msg),
            ApiError::Unauthorized => {
                message_response(StatusCode::UNAUTHORIZED, "Sin autorización")
            }
            ApiError::Database(e) => match e {
                newsroom_db::DbError::NotFound(msg) => {
                    message_response(StatusCode::NOT_FOUND, &msg)
                }
                newsroom_db::DbError::Duplicate(msg) => {
                    message_response(StatusCode::UNPROCESSABLE_ENTITY, &msg)
                }
                // Raw driver detail stays in the log, not the response
                other => {
                    error!("Database error: {}", other);
                    message_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Error al procesar la solicitud",
                    )
                }
            },
            ApiError::Auth(e) => {
                let (status, message) = e.status_and_message();
                message_response(status, message)
            }
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}
