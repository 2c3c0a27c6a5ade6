//! Renders service failures as the uniform JSON error envelope.
//!
//! Every failure leaves the HTTP layer as
//! `{statusCode, message, error, timestamp, path, details?}`. Driver messages,
//! constraint names and error chains only go into `details` outside production.

use crate::app::ServiceError;
use crate::storage::{StorageError, EMAIL_UNIQUE_CONSTRAINT};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use utoipa::ToSchema;

const DUPLICATE_EMAIL: &str = "Contact with this email already exists";
const EMAIL_MUST_BE_UNIQUE: &str = "Email must be unique";

/// `message` is a list for validation failures and a single string otherwise.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Error envelope.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    #[schema(value_type = Object)]
    pub message: ErrorMessage,
    pub error: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapper {
    production: bool,
}

impl ErrorMapper {
    pub fn new(production: bool) -> Self {
        Self { production }
    }

    fn internal(&self, value: JsonValue) -> Option<JsonValue> {
        if self.production {
            None
        } else {
            Some(value)
        }
    }

    fn storage(&self, err: &StorageError) -> (StatusCode, String, &'static str, Option<JsonValue>) {
        let internal = self.internal(json!({
            "constraint": err.constraint(),
            "cause": err.to_string(),
        }));
        match err {
            StorageError::UniqueViolation { constraint, .. }
                if constraint.as_deref() == Some(EMAIL_UNIQUE_CONSTRAINT) =>
            {
                (
                    StatusCode::CONFLICT,
                    DUPLICATE_EMAIL.to_string(),
                    EMAIL_MUST_BE_UNIQUE,
                    internal,
                )
            }
            StorageError::UniqueViolation { .. } => (
                StatusCode::BAD_REQUEST,
                "A record with this information already exists".to_string(),
                "Database Error",
                internal,
            ),
            StorageError::ForeignKeyViolation { .. } => (
                StatusCode::BAD_REQUEST,
                "Referenced record does not exist or cannot be modified".to_string(),
                "Database Error",
                internal,
            ),
            StorageError::CheckViolation { .. } => (
                StatusCode::BAD_REQUEST,
                "Data validation failed at the database level".to_string(),
                "Database Error",
                internal,
            ),
            StorageError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "Internal Server Error",
                self.internal(json!({ "cause": err.to_string() })),
            ),
        }
    }

    /// Builds the status and envelope for `err` raised while serving `path`.
    pub fn map(&self, err: &ServiceError, path: &str) -> (StatusCode, ErrorResponse) {
        let (status, message, error, details) = match err {
            ServiceError::Validation(failure) => (
                StatusCode::BAD_REQUEST,
                ErrorMessage::Many(failure.messages()),
                "Bad Request",
                Some(json!(failure.violations())),
            ),
            ServiceError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorMessage::One(message.clone()),
                "Bad Request",
                None,
            ),
            ServiceError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorMessage::One(message.clone()),
                EMAIL_MUST_BE_UNIQUE,
                None,
            ),
            ServiceError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                ErrorMessage::One(message.clone()),
                "Not Found",
                None,
            ),
            ServiceError::Storage(storage) => {
                let (status, message, error, details) = self.storage(storage);
                (status, ErrorMessage::One(message), error, details)
            }
            ServiceError::Unexpected(cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorMessage::One("Internal server error".to_string()),
                "Internal Server Error",
                self.internal(json!({ "cause": format!("{:#}", cause) })),
            ),
        };

        (
            status,
            ErrorResponse {
                status_code: status.as_u16(),
                message,
                error: error.to_string(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                path: path.to_string(),
                details,
            },
        )
    }

    /// Logs `err` and turns it into an HTTP response.
    pub fn render(&self, err: ServiceError, path: &str) -> Response {
        let (status, body) = self.map(&err, path);
        if status.is_server_error() {
            tracing::error!(path, status = status.as_u16(), error = %err, "request failed");
        } else if matches!(err, ServiceError::Storage(_)) {
            tracing::warn!(path, status = status.as_u16(), error = %err, "storage constraint rejected request");
        } else {
            tracing::debug!(path, status = status.as_u16(), error = %err, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}
