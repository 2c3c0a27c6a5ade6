use crate::domain::validate::ValidationFailure;
use crate::storage::StorageError;
use thiserror::Error;

/// Every way a contact operation can fail.
///
/// Expected outcomes (validation, conflict, not-found, bad id) are their own
/// variants; anything coming out of the store is carried as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn contact_not_found(id: i64) -> Self {
        Self::NotFound {
            message: format!("Contact with ID {} not found", id),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
