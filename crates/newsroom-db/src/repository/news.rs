//! News article operations

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::DbError;
use crate::models::{
    NewNewsArticle, NewsArticle, NewsAuthor, NewsDetail, RelatedRef, UpdateNewsArticle,
};
use crate::repository::Database;
use crate::utils::sentinel_date;

/// Equality filters for article listings
#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub categoria_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub activo: Option<bool>,
}

const NEWS_DETAIL_SELECT: &str = r#"
    SELECT n.*,
           c.nombre AS categoria_nombre,
           e.nombre AS estado_nombre,
           u.username AS usuario_username,
           u.perfil_id AS usuario_perfil_id,
           p.nombre AS perfil_nombre
    FROM noticias n
    LEFT JOIN categorias c ON c.id = n.categoria_id
    LEFT JOIN estados e ON e.id = n.estado_id
    LEFT JOIN usuarios u ON u.id = n.usuario_id
    LEFT JOIN perfiles p ON p.id = u.perfil_id
"#;

impl Database {
    // ==================== News Operations ====================

    /// Insert a new article
    pub async fn insert_news(&self, article: NewNewsArticle) -> Result<NewsArticle, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO noticias (categoria_id, estado_id, usuario_id, titulo,
                                  fecha_publicacion, descripcion, imagen, activo)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(article.categoria_id)
        .bind(article.estado_id)
        .bind(article.usuario_id)
        .bind(&article.titulo)
        .bind(article.fecha_publicacion.to_rfc3339())
        .bind(&article.descripcion)
        .bind(&article.imagen)
        .bind(article.activo)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(NewsArticle {
            id,
            categoria_id: article.categoria_id,
            estado_id: article.estado_id,
            usuario_id: article.usuario_id,
            titulo: article.titulo,
            fecha_publicacion: article.fecha_publicacion,
            descripcion: article.descripcion,
            imagen: article.imagen,
            activo: article.activo,
            user_alta: "Admin".to_string(),
            fecha_alta: sentinel_date(),
            user_mod: String::new(),
            fecha_mod: sentinel_date(),
            user_baja: String::new(),
            fecha_baja: sentinel_date(),
        })
    }

    /// Get an article by ID, without relations
    pub async fn get_news(&self, id: i64) -> Result<Option<NewsArticle>, DbError> {
        let result = sqlx::query("SELECT * FROM noticias WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| NewsArticle::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an article by ID with category, state and author resolved
    pub async fn get_news_detail(&self, id: i64) -> Result<Option<NewsDetail>, DbError> {
        let sql = format!("{} WHERE n.id = ?", NEWS_DETAIL_SELECT);
        let result = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        result.map(|row| news_detail_from_row(&row).map_err(DbError::from)).transpose()
    }

    /// List articles matching the given filters, with relations resolved
    pub async fn list_news(&self, filter: &NewsFilter) -> Result<Vec<NewsDetail>, DbError> {
        let sql = format!(
            r#"{}
            WHERE (?1 IS NULL OR n.categoria_id = ?1)
              AND (?2 IS NULL OR n.estado_id = ?2)
              AND (?3 IS NULL OR n.usuario_id = ?3)
              AND (?4 IS NULL OR n.activo = ?4)
            ORDER BY n.id
            "#,
            NEWS_DETAIL_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(filter.categoria_id)
            .bind(filter.estado_id)
            .bind(filter.usuario_id)
            .bind(filter.activo)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| news_detail_from_row(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to an article, returning whether a row was touched
    pub async fn update_news(&self, id: i64, changes: UpdateNewsArticle) -> Result<bool, DbError> {
        let Some(current) = self.get_news(id).await? else {
            return Ok(false);
        };

        let fecha_publicacion: DateTime<Utc> = changes
            .fecha_publicacion
            .unwrap_or(current.fecha_publicacion);

        let result = sqlx::query(
            r#"
            UPDATE noticias
            SET categoria_id = ?, estado_id = ?, usuario_id = ?, titulo = ?,
                fecha_publicacion = ?, descripcion = ?, imagen = ?, activo = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.categoria_id.unwrap_or(current.categoria_id))
        .bind(changes.estado_id.unwrap_or(current.estado_id))
        .bind(changes.usuario_id.unwrap_or(current.usuario_id))
        .bind(changes.titulo.unwrap_or(current.titulo))
        .bind(fecha_publicacion.to_rfc3339())
        .bind(changes.descripcion.unwrap_or(current.descripcion))
        .bind(changes.imagen.unwrap_or(current.imagen))
        .bind(changes.activo.unwrap_or(current.activo))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an article
    pub async fn delete_news(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM noticias WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn news_detail_from_row(row: &SqliteRow) -> Result<NewsDetail, sqlx::Error> {
    let article = NewsArticle::try_from(row)?;

    let categoria = row
        .try_get::<Option<String>, _>("categoria_nombre")?
        .map(|nombre| RelatedRef { id: article.categoria_id, nombre });
    let estado = row
        .try_get::<Option<String>, _>("estado_nombre")?
        .map(|nombre| RelatedRef { id: article.estado_id, nombre });

    let usuario = match row.try_get::<Option<String>, _>("usuario_username")? {
        Some(username) => {
            let perfil = match (
                row.try_get::<Option<i64>, _>("usuario_perfil_id")?,
                row.try_get::<Option<String>, _>("perfil_nombre")?,
            ) {
                (Some(id), Some(nombre)) => Some(RelatedRef { id, nombre }),
                _ => None,
            };
            Some(NewsAuthor {
                id: article.usuario_id,
                username,
                perfil,
            })
        }
        None => None,
    };

    Ok(NewsDetail {
        article,
        categoria,
        estado,
        usuario,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCategory, NewNewsState, NewUser};

    async fn seeded_db() -> (Database, i64, i64, i64) {
        let db = Database::new_in_memory().await.unwrap();
        db.ensure_profile(2, "Contribuidor").await.unwrap();

        let categoria = db
            .insert_category(NewCategory {
                nombre: "Deportes".to_string(),
                descripcion: String::new(),
                activo: true,
            })
            .await
            .unwrap();
        let estado = db
            .insert_state(NewNewsState {
                nombre: "Publicada".to_string(),
                descripcion: String::new(),
                activo: true,
            })
            .await
            .unwrap();
        let usuario = db
            .insert_user(NewUser {
                username: "ana".to_string(),
                email: "ana@x.com".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                perfil_id: 2,
                activo: true,
            })
            .await
            .unwrap();

        (db, categoria.id, estado.id, usuario.id)
    }

    fn sample_article(categoria_id: i64, estado_id: i64, usuario_id: i64) -> NewNewsArticle {
        NewNewsArticle {
            categoria_id,
            estado_id,
            usuario_id,
            titulo: "Final de copa".to_string(),
            fecha_publicacion: Utc::now(),
            descripcion: "Crónica del partido".to_string(),
            imagen: "https://example.com/final.jpg".to_string(),
            activo: true,
        }
    }

    #[tokio::test]
    async fn test_news_detail_resolves_relations() {
        let (db, categoria_id, estado_id, usuario_id) = seeded_db().await;
        let created = db
            .insert_news(sample_article(categoria_id, estado_id, usuario_id))
            .await
            .unwrap();

        let detail = db.get_news_detail(created.id).await.unwrap().unwrap();
        assert_eq!(detail.categoria.as_ref().unwrap().nombre, "Deportes");
        assert_eq!(detail.estado.as_ref().unwrap().nombre, "Publicada");

        let author = detail.usuario.as_ref().unwrap();
        assert_eq!(author.username, "ana");
        assert_eq!(author.perfil.as_ref().unwrap().nombre, "Contribuidor");
    }

    #[tokio::test]
    async fn test_list_news_filters() {
        let (db, categoria_id, estado_id, usuario_id) = seeded_db().await;
        db.insert_news(sample_article(categoria_id, estado_id, usuario_id))
            .await
            .unwrap();
        let mut second = sample_article(categoria_id, estado_id, usuario_id);
        second.activo = false;
        db.insert_news(second).await.unwrap();

        let all = db.list_news(&NewsFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let active = db
            .list_news(&NewsFilter {
                activo: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_news() {
        let (db, categoria_id, estado_id, usuario_id) = seeded_db().await;
        let created = db
            .insert_news(sample_article(categoria_id, estado_id, usuario_id))
            .await
            .unwrap();

        assert!(
            db.update_news(
                created.id,
                UpdateNewsArticle {
                    titulo: Some("Final de copa (actualizada)".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
        );
        let updated = db.get_news(created.id).await.unwrap().unwrap();
        assert_eq!(updated.titulo, "Final de copa (actualizada)");

        assert!(db.delete_news(created.id).await.unwrap());
        assert!(db.get_news_detail(created.id).await.unwrap().is_none());
    }
}
