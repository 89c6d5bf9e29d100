//! Category operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{Category, NewCategory, UpdateCategory};
use crate::repository::Database;
use crate::utils::sentinel_date;

/// Equality filters for category listings
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

impl Database {
    // ==================== Category Operations ====================

    /// Insert a new category
    pub async fn insert_category(&self, category: NewCategory) -> Result<Category, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO categorias (nombre, descripcion, activo)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&category.nombre)
        .bind(&category.descripcion)
        .bind(category.activo)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Category {
            id,
            nombre: category.nombre,
            descripcion: category.descripcion,
            activo: category.activo,
            user_alta: "Admin".to_string(),
            fecha_alta: sentinel_date(),
            user_mod: String::new(),
            fecha_mod: sentinel_date(),
            user_baja: String::new(),
            fecha_baja: sentinel_date(),
        })
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, DbError> {
        let result = sqlx::query("SELECT * FROM categorias WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Category::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List categories matching the given filters
    pub async fn list_categories(&self, filter: &CategoryFilter) -> Result<Vec<Category>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM categorias
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
            .map(|row| Category::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a category, returning whether a row was touched
    pub async fn update_category(&self, id: i64, changes: UpdateCategory) -> Result<bool, DbError> {
        let Some(current) = self.get_category(id).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE categorias
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

    /// Delete a category
    pub async fn delete_category(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM categorias WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deportes() -> NewCategory {
        NewCategory {
            nombre: "Deportes".to_string(),
            descripcion: "Noticias deportivas".to_string(),
            activo: true,
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::new_in_memory().await.unwrap();

        let created = db.insert_category(deportes()).await.unwrap();
        assert!(created.id > 0);

        let fetched = db.get_category(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.nombre, "Deportes");

        assert!(
            db.update_category(
                created.id,
                UpdateCategory {
                    nombre: Some("Cultura".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
        );
        let updated = db.get_category(created.id).await.unwrap().unwrap();
        assert_eq!(updated.nombre, "Cultura");
        assert_eq!(updated.descripcion, "Noticias deportivas");

        assert!(db.delete_category(created.id).await.unwrap());
        assert!(db.get_category(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_categories_filters() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_category(deportes()).await.unwrap();
        db.insert_category(NewCategory {
            nombre: "Cultura".to_string(),
            descripcion: String::new(),
            activo: false,
        })
        .await
        .unwrap();

        let all = db.list_categories(&CategoryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let active = db
            .list_categories(&CategoryFilter {
                activo: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].nombre, "Deportes");
    }
}
