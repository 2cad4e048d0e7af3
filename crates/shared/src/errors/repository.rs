use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

impl RepositoryError {
    /// Maps unique-constraint violations to [`RepositoryError::AlreadyExists`],
    /// everything else passes through as a database error.
    pub fn from_unique(err: SqlxError, what: &str) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::AlreadyExists(what.to_string())
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}
