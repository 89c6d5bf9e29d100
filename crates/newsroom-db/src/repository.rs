//! Database repository implementation

mod categories;
mod news;
mod profiles;
mod states;
mod users;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::error::DbError;

pub use categories::CategoryFilter;
pub use news::NewsFilter;
pub use states::StateFilter;
pub use users::UserFilter;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Create an in-memory database (single connection, used by tests and demos)
    pub async fn new_in_memory() -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS perfiles (
                id INTEGER PRIMARY KEY,
                nombre TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usuarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                perfil_id INTEGER NOT NULL REFERENCES perfiles(id),
                activo INTEGER NOT NULL DEFAULT 1,
                user_alta TEXT NOT NULL DEFAULT 'Admin',
                fecha_alta TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_mod TEXT NOT NULL DEFAULT '',
                fecha_mod TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_baja TEXT NOT NULL DEFAULT '',
                fecha_baja TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categorias (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                descripcion TEXT NOT NULL DEFAULT '',
                activo INTEGER NOT NULL DEFAULT 1,
                user_alta TEXT NOT NULL DEFAULT 'Admin',
                fecha_alta TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_mod TEXT NOT NULL DEFAULT '',
                fecha_mod TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_baja TEXT NOT NULL DEFAULT '',
                fecha_baja TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS estados (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                descripcion TEXT NOT NULL DEFAULT '',
                activo INTEGER NOT NULL DEFAULT 1,
                user_alta TEXT NOT NULL DEFAULT 'Admin',
                fecha_alta TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_mod TEXT NOT NULL DEFAULT '',
                fecha_mod TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_baja TEXT NOT NULL DEFAULT '',
                fecha_baja TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS noticias (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                categoria_id INTEGER NOT NULL REFERENCES categorias(id),
                estado_id INTEGER NOT NULL REFERENCES estados(id),
                usuario_id INTEGER NOT NULL REFERENCES usuarios(id),
                titulo TEXT NOT NULL,
                fecha_publicacion TEXT NOT NULL,
                descripcion TEXT NOT NULL,
                imagen TEXT NOT NULL DEFAULT '',
                activo INTEGER NOT NULL DEFAULT 1,
                user_alta TEXT NOT NULL DEFAULT 'Admin',
                fecha_alta TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_mod TEXT NOT NULL DEFAULT '',
                fecha_mod TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00',
                user_baja TEXT NOT NULL DEFAULT '',
                fecha_baja TEXT NOT NULL DEFAULT '1990-01-01T00:00:00+00:00'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_noticias_categoria ON noticias(categoria_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_noticias_usuario ON noticias(usuario_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }
}
