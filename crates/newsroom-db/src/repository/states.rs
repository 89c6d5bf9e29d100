//! Publication state operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewNewsState, NewsState, UpdateNewsState};
use crate::repository::Database;
use crate::utils::sentinel_date;

/// Equality filters for state listings
#[derive(Debug, Clone, Default)]
pub struct StateFilter {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

impl Database {
    // ==================== State Operations ====================

    /// Insert a new publication state
    pub async fn insert_state(&self, state: NewNewsState) -> Result<NewsState, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO estados (nombre, descripcion, activo)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&state.nombre)
        .bind(&state.descripcion)
        .bind(state.activo)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(NewsState {
            id,
            nombre: state.nombre,
            descripcion: state.descripcion,
            activo: state.activo,
            user_alta: "Admin".to_string(),
            fecha_alta: sentinel_date(),
            user_mod: String::new(),
            fecha_mod: sentinel_date(),
            user_baja: String::new(),
            fecha_baja: sentinel_date(),
        })
    }

    /// Get a publication state by ID
    pub async fn get_state(&self, id: i64) -> Result<Option<NewsState>, DbError> {
        let result = sqlx::query("SELECT * FROM estados WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| NewsState::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List publication states matching the given filters
    pub async fn list_states(&self, filter: &StateFilter) -> Result<Vec<NewsState>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM estados
            WHERE (?1 IS NULL OR nombre = ?1)
              AND (?2 IS NULL OR descripcion = ?2)
              AND (?3 IS NULL OR activo = ?3)
            ORDER BY id
            "#,
        )
        .bind(&filter.nombre)
        .bind(&filter.descripcion)
        .bind(filter.activo)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| NewsState::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a publication state
    pub async fn update_state(&self, id: i64, changes: UpdateNewsState) -> Result<bool, DbError> {
        let Some(current) = self.get_state(id).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE estados
            SET nombre = ?, descripcion = ?, activo = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.nombre.unwrap_or(current.nombre))
        .bind(changes.descripcion.unwrap_or(current.descripcion))
        .bind(changes.activo.unwrap_or(current.activo))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a publication state
    pub async fn delete_state(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM estados WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_crud() {
        let db = Database::new_in_memory().await.unwrap();

        let created = db
            .insert_state(NewNewsState {
                nombre: "Publicada".to_string(),
                descripcion: "Visible al público".to_string(),
                activo: true,
            })
            .await
            .unwrap();

        let fetched = db.get_state(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.nombre, "Publicada");

        assert!(
            db.update_state(
                created.id,
                UpdateNewsState {
                    activo: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
        );
        assert!(!db.get_state(created.id).await.unwrap().unwrap().activo);

        assert!(db.delete_state(created.id).await.unwrap());
        assert!(!db.delete_state(created.id).await.unwrap());
    }
}
