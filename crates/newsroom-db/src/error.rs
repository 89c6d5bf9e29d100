//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Connection(sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

/// Unique-constraint violations become `Duplicate` so a racing insert
/// that slips past a pre-check still surfaces as a duplicate, not as a
/// masked driver error.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.kind() == sqlx::error::ErrorKind::UniqueViolation
        {
            return DbError::Duplicate("Ya existe un registro con esos datos únicos".to_string());
        }
        DbError::Connection(err)
    }
}
