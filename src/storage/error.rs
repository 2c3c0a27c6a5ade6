//! Typed storage errors.
//!
//! Driver errors are classified by SQLSTATE so the HTTP layer can tell a
//! constraint violation (client-fixable) from a connectivity failure.

use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unique constraint violated: {message}")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("foreign key constraint violated: {message}")]
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("check constraint violated: {message}")]
    CheckViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Connection, timeout, decode or any other driver failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    /// Name of the violated constraint, when the failure is a constraint violation.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint, .. }
            | Self::ForeignKeyViolation { constraint, .. }
            | Self::CheckViolation { constraint, .. } => constraint.as_deref(),
            Self::Database(_) => None,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

fn classify(db_err: &dyn sqlx::error::DatabaseError) -> Option<StorageError> {
    let code = db_err.code()?;
    let constraint = db_err.constraint().map(str::to_owned);
    let message = db_err.message().to_owned();
    match code.as_ref() {
        UNIQUE_VIOLATION => Some(StorageError::UniqueViolation {
            constraint,
            message,
        }),
        FOREIGN_KEY_VIOLATION => Some(StorageError::ForeignKeyViolation {
            constraint,
            message,
        }),
        CHECK_VIOLATION => Some(StorageError::CheckViolation {
            constraint,
            message,
        }),
        _ => None,
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let classified = match &err {
            sqlx::Error::Database(db_err) => classify(db_err.as_ref()),
            _ => None,
        };
        classified.unwrap_or(Self::Database(err))
    }
}
