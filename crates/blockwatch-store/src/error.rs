//! Store error taxonomy.

use thiserror::Error;

/// Errors surfaced by the block store.
///
/// Uniqueness conflicts are never errors: `upsert_many` silences them by
/// contract. `Constraint` is reserved for non-uniqueness violations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or the query failed transiently.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A non-uniqueness constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::CheckViolation
                | sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation => {
                    StoreError::Constraint(db.message().to_string())
                }
                _ => StoreError::Unavailable(err.to_string()),
            },
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
