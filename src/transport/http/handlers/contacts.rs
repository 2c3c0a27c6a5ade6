use crate::app::{parse_contact_id, ServiceError, ServiceResult};
use crate::domain::contact::ContactFilter;
use crate::domain::validate::{validate_create, validate_update};
use crate::transport::http::types::{success, AppState, DeleteResponse, ListQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;

fn json_body(request: Result<Json<JsonValue>, JsonRejection>) -> ServiceResult<JsonValue> {
    request
        .map(|Json(body)| body)
        .map_err(|e| ServiceError::bad_request(format!("Invalid JSON body: {}", e.body_text())))
}

/// Request target as the client sent it, query string included.
fn request_path(uri: &OriginalUri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

fn respond(state: &AppState, uri: &OriginalUri, result: ServiceResult<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(e) => state.errors.render(e, request_path(uri)),
    }
}

#[utoipa::path(
    post,
    path = "/contacts",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Contact created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_contact_handler(
    State(state): State<AppState>,
    uri: OriginalUri,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let result: ServiceResult<Response> = async {
        let body = json_body(request)?;
        let input = validate_create(&body)?;
        let contact = state.contacts.create(input).await?;
        success(StatusCode::CREATED, "Contact created successfully", &contact)
    }
    .await;
    respond(&state, &uri, result)
}

#[utoipa::path(
    get,
    path = "/contacts",
    params(ListQuery),
    responses(
        (status = 200, description = "Contacts, newest first", body = ApiResponse),
        (status = 404, description = "No contacts matched", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    uri: OriginalUri,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let result: ServiceResult<Response> = async {
        let Query(query) = query
            .map_err(|e| ServiceError::bad_request(format!("Invalid query: {}", e.body_text())))?;
        let filter = ContactFilter {
            search: query.search,
        };
        let contacts = state.contacts.find_all(&filter).await?;
        success(StatusCode::OK, "Contacts retrieved successfully", &contacts)
    }
    .await;
    respond(&state, &uri, result)
}

#[utoipa::path(
    get,
    path = "/contacts/{id}",
    params(
        ("id" = i64, Path, description = "Contact id (positive integer)")
    ),
    responses(
        (status = 200, description = "Contact", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_contact_handler(
    State(state): State<AppState>,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let result: ServiceResult<Response> = async {
        let id = parse_contact_id(&id)?;
        let contact = state.contacts.find_one(id).await?;
        success(StatusCode::OK, "Contact retrieved successfully", &contact)
    }
    .await;
    respond(&state, &uri, result)
}

#[utoipa::path(
    put,
    path = "/contacts/{id}",
    params(
        ("id" = i64, Path, description = "Contact id (positive integer)")
    ),
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Contact updated", body = ApiResponse),
        (status = 400, description = "Validation failed or invalid id", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_contact_handler(
    State(state): State<AppState>,
    uri: OriginalUri,
    Path(id): Path<String>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let result: ServiceResult<Response> = async {
        let id = parse_contact_id(&id)?;
        let body = json_body(request)?;
        let changes = validate_update(&body)?;
        let contact = state.contacts.update(id, changes).await?;
        success(StatusCode::OK, "Contact updated successfully", &contact)
    }
    .await;
    respond(&state, &uri, result)
}

#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    params(
        ("id" = i64, Path, description = "Contact id (positive integer)")
    ),
    responses(
        (status = 200, description = "Contact deleted; body holds the removed record", body = ApiResponse),
        (status = 204, description = "Contact deleted (no-content mode)"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_contact_handler(
    State(state): State<AppState>,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let result: ServiceResult<Response> = async {
        let id = parse_contact_id(&id)?;
        let snapshot = state.contacts.delete(id).await?;
        match state.delete_response {
            DeleteResponse::Snapshot => {
                success(StatusCode::OK, "Contact deleted successfully", &snapshot)
            }
            DeleteResponse::NoContent => Ok(StatusCode::NO_CONTENT.into_response()),
        }
    }
    .await;
    respond(&state, &uri, result)
}

/// Fallback for unknown routes, rendered in the error envelope.
pub async fn route_not_found_handler(
    State(state): State<AppState>,
    method: Method,
    uri: OriginalUri,
) -> Response {
    let err = ServiceError::not_found(format!("Cannot {} {}", method, request_path(&uri)));
    respond(&state, &uri, Err(err))
}
