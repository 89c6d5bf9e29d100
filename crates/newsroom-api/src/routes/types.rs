//! Request/Response DTOs
//!
//! Credential and creation payloads use `Option` fields so that missing
//! keys reach the validators and come back as field-keyed 422 errors
//! instead of a deserialization rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Registration request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub nick: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub perfil_id: Option<i64>,
}

// ==================== User Types ====================

/// Create user request (admin surface)
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub perfil_id: Option<i64>,
    pub activo: Option<bool>,
}

/// Update user request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub perfil_id: Option<i64>,
    pub activo: Option<bool>,
}

/// User listing filters
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UserListQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    pub perfil_id: Option<i64>,
    pub activo: Option<bool>,
}

// ==================== Profile Types ====================

/// Create/update profile request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ProfileRequest {
    pub id: Option<i64>,
    pub nombre: Option<String>,
}

// ==================== Category / State Types ====================

/// Create category or state request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateNamedRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

/// Update category or state request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateNamedRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

/// Category/state listing filters
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct NamedListQuery {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

// ==================== News Types ====================

/// Create article request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateNewsRequest {
    pub categoria_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub titulo: Option<String>,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
    pub activo: Option<bool>,
}

/// Update article request
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateNewsRequest {
    pub categoria_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub titulo: Option<String>,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
    pub activo: Option<bool>,
}

/// Article listing filters
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct NewsListQuery {
    pub categoria_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub activo: Option<bool>,
}

/// Plain message response (updates, deletes)
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
