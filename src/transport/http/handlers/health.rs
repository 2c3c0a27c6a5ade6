use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.contacts.check_health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                status_code: StatusCode::OK.as_u16(),
                message: "Service is healthy".to_string(),
                data: Some(serde_json::json!({ "status": "ok" })),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    status_code: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                    message: "Service is unhealthy".to_string(),
                    data: Some(serde_json::json!({ "status": "unhealthy" })),
                }),
            )
        }
    }
}
