//! Database models
//!
//! Column names follow the original Spanish schema (`perfil_id`, `activo`,
//! audit columns `user_alta`/`fecha_alta` and friends) so that serialized
//! records keep the shape API clients already consume.

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub perfil_id: i64,
    pub activo: bool,
    pub user_alta: String,
    pub fecha_alta: DateTime<Utc>,
    pub user_mod: String,
    pub fecha_mod: DateTime<Utc>,
    pub user_baja: String,
    pub fecha_baja: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub perfil_id: i64,
    pub activo: bool,
}

/// Partial user update
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub perfil_id: Option<i64>,
    pub activo: Option<bool>,
}

/// Authorization profile (role tier record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub nombre: String,
}

/// News category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub activo: bool,
    pub user_alta: String,
    pub fecha_alta: DateTime<Utc>,
    pub user_mod: String,
    pub fecha_mod: DateTime<Utc>,
    pub user_baja: String,
    pub fecha_baja: DateTime<Utc>,
}

/// New category (for insertion)
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub nombre: String,
    pub descripcion: String,
    pub activo: bool,
}

/// Partial category update
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

/// Publication state of a news article (draft, published, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsState {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub activo: bool,
    pub user_alta: String,
    pub fecha_alta: DateTime<Utc>,
    pub user_mod: String,
    pub fecha_mod: DateTime<Utc>,
    pub user_baja: String,
    pub fecha_baja: DateTime<Utc>,
}

/// New state (for insertion)
#[derive(Debug, Clone)]
pub struct NewNewsState {
    pub nombre: String,
    pub descripcion: String,
    pub activo: bool,
}

/// Partial state update
#[derive(Debug, Clone, Default)]
pub struct UpdateNewsState {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

/// News article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub categoria_id: i64,
    pub estado_id: i64,
    pub usuario_id: i64,
    pub titulo: String,
    pub fecha_publicacion: DateTime<Utc>,
    pub descripcion: String,
    pub imagen: String,
    pub activo: bool,
    pub user_alta: String,
    pub fecha_alta: DateTime<Utc>,
    pub user_mod: String,
    pub fecha_mod: DateTime<Utc>,
    pub user_baja: String,
    pub fecha_baja: DateTime<Utc>,
}

/// New article (for insertion)
#[derive(Debug, Clone)]
pub struct NewNewsArticle {
    pub categoria_id: i64,
    pub estado_id: i64,
    pub usuario_id: i64,
    pub titulo: String,
    pub fecha_publicacion: DateTime<Utc>,
    pub descripcion: String,
    pub imagen: String,
    pub activo: bool,
}

/// Partial article update
#[derive(Debug, Clone, Default)]
pub struct UpdateNewsArticle {
    pub categoria_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub titulo: Option<String>,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
    pub activo: Option<bool>,
}

/// Id/name pair for joined lookups (category, state, profile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedRef {
    pub id: i64,
    pub nombre: String,
}

/// Article author with its resolved profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsAuthor {
    pub id: i64,
    pub username: String,
    pub perfil: Option<RelatedRef>,
}

/// Article with its category, state and author resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub categoria: Option<RelatedRef>,
    pub estado: Option<RelatedRef>,
    pub usuario: Option<NewsAuthor>,
}

/// User with its resolved profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub perfil: Option<RelatedRef>,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            perfil_id: row.try_get("perfil_id")?,
            activo: row.try_get("activo")?,
            user_alta: row.try_get("user_alta")?,
            fecha_alta: parse_datetime_or_now(&row.try_get::<String, _>("fecha_alta")?),
            user_mod: row.try_get("user_mod")?,
            fecha_mod: parse_datetime_or_now(&row.try_get::<String, _>("fecha_mod")?),
            user_baja: row.try_get("user_baja")?,
            fecha_baja: parse_datetime_or_now(&row.try_get::<String, _>("fecha_baja")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Profile {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Category {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            descripcion: row.try_get("descripcion")?,
            activo: row.try_get("activo")?,
            user_alta: row.try_get("user_alta")?,
            fecha_alta: parse_datetime_or_now(&row.try_get::<String, _>("fecha_alta")?),
            user_mod: row.try_get("user_mod")?,
            fecha_mod: parse_datetime_or_now(&row.try_get::<String, _>("fecha_mod")?),
            user_baja: row.try_get("user_baja")?,
            fecha_baja: parse_datetime_or_now(&row.try_get::<String, _>("fecha_baja")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for NewsState {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(NewsState {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            descripcion: row.try_get("descripcion")?,
            activo: row.try_get("activo")?,
            user_alta: row.try_get("user_alta")?,
            fecha_alta: parse_datetime_or_now(&row.try_get::<String, _>("fecha_alta")?),
            user_mod: row.try_get("user_mod")?,
            fecha_mod: parse_datetime_or_now(&row.try_get::<String, _>("fecha_mod")?),
            user_baja: row.try_get("user_baja")?,
            fecha_baja: parse_datetime_or_now(&row.try_get::<String, _>("fecha_baja")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for NewsArticle {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(NewsArticle {
            id: row.try_get("id")?,
            categoria_id: row.try_get("categoria_id")?,
            estado_id: row.try_get("estado_id")?,
            usuario_id: row.try_get("usuario_id")?,
            titulo: row.try_get("titulo")?,
            fecha_publicacion: parse_datetime_or_now(
                &row.try_get::<String, _>("fecha_publicacion")?,
            ),
            descripcion: row.try_get("descripcion")?,
            imagen: row.try_get("imagen")?,
            activo: row.try_get("activo")?,
            user_alta: row.try_get("user_alta")?,
            fecha_alta: parse_datetime_or_now(&row.try_get::<String, _>("fecha_alta")?),
            user_mod: row.try_get("user_mod")?,
            fecha_mod: parse_datetime_or_now(&row.try_get::<String, _>("fecha_mod")?),
            user_baja: row.try_get("user_baja")?,
            fecha_baja: parse_datetime_or_now(&row.try_get::<String, _>("fecha_baja")?),
        })
    }
}
