use crate::app::{ContactService, ServiceError};
use crate::transport::http::errors::ErrorMapper;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<ContactService>,
    pub errors: ErrorMapper,
    pub delete_response: DeleteResponse,
}

/// What `DELETE /contacts/{id}` sends back on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteResponse {
    /// 200 with the deleted contact in the envelope.
    #[default]
    Snapshot,
    /// 204 with no body.
    NoContent,
}

impl FromStr for DeleteResponse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" | "200" => Ok(Self::Snapshot),
            "no_content" | "no-content" | "204" => Ok(Self::NoContent),
            other => Err(format!("unknown delete response '{}'", other)),
        }
    }
}

/// Success envelope.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
}

/// Body accepted by `POST /contacts` and `PUT /contacts/{id}`.
///
/// Handlers take the raw JSON and run it through the validator so that every
/// broken rule is reported at once; this type only documents the shape.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Substring matched against name, email and phone.
    #[serde(default)]
    pub search: Option<String>,
}

/// Wraps `data` in the success envelope.
pub fn success<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: &T,
) -> Result<Response, ServiceError> {
    let data = serde_json::to_value(data)
        .map_err(|e| anyhow::anyhow!("failed to serialize response data: {}", e))?;
    Ok((
        status,
        Json(ApiResponse {
            status_code: status.as_u16(),
            message: message.to_string(),
            data: Some(data),
        }),
    )
        .into_response())
}
