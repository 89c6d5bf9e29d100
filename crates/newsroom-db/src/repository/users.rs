//! User operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, Profile, RelatedRef, UpdateUser, User, UserDetail};
use crate::repository::Database;
use crate::utils::sentinel_date;

/// Equality filters for user listings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub perfil_id: Option<i64>,
    pub activo: Option<bool>,
}

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Username and email are unique; a conflicting record yields
    /// `DbError::Duplicate` before the insert is attempted.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "Ya existe un usuario con el username '{}'",
                user.username
            )));
        }
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "Ya existe un usuario con el email '{}'",
                user.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (username, email, password_hash, perfil_id, activo)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.perfil_id)
        .bind(user.activo)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            perfil_id: user.perfil_id,
            activo: user.activo,
            user_alta: "Admin".to_string(),
            fecha_alta: sentinel_date(),
            user_mod: String::new(),
            fecha_mod: sentinel_date(),
            user_baja: String::new(),
            fecha_baja: sentinel_date(),
        })
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query("SELECT * FROM usuarios WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query("SELECT * FROM usuarios WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query("SELECT * FROM usuarios WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an active user by email (credential verification lookup)
    pub async fn get_active_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query("SELECT * FROM usuarios WHERE email = ? AND activo = 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List users matching the given filters, with their profile resolved
    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserDetail>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM usuarios
            WHERE (?1 IS NULL OR username = ?1)
              AND (?2 IS NULL OR email = ?2)
              AND (?3 IS NULL OR perfil_id = ?3)
              AND (?4 IS NULL OR activo = ?4)
            ORDER BY id
            "#,
        )
        .bind(&filter.username)
        .bind(&filter.email)
        .bind(filter.perfil_id)
        .bind(filter.activo)
        .fetch_all(&self.pool)
        .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            let user = User::try_from(row)?;
            let perfil = self.get_profile(user.perfil_id).await?;
            users.push(attach_profile(user, perfil));
        }
        Ok(users)
    }

    /// Get a user by ID with its profile resolved
    pub async fn get_user_detail(&self, id: i64) -> Result<Option<UserDetail>, DbError> {
        let Some(user) = self.get_user_by_id(id).await? else {
            return Ok(None);
        };
        let perfil = self.get_profile(user.perfil_id).await?;
        Ok(Some(attach_profile(user, perfil)))
    }

    /// Apply a partial update to a user, returning whether a row was touched
    pub async fn update_user(&self, id: i64, changes: UpdateUser) -> Result<bool, DbError> {
        let Some(current) = self.get_user_by_id(id).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET username = ?, email = ?, password_hash = ?, perfil_id = ?, activo = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.username.unwrap_or(current.username))
        .bind(changes.email.unwrap_or(current.email))
        .bind(changes.password_hash.unwrap_or(current.password_hash))
        .bind(changes.perfil_id.unwrap_or(current.perfil_id))
        .bind(changes.activo.unwrap_or(current.activo))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM usuarios")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

fn attach_profile(user: User, perfil: Option<Profile>) -> UserDetail {
    UserDetail {
        user,
        perfil: perfil.map(|p| RelatedRef {
            id: p.id,
            nombre: p.nombre,
        }),
    }
}
