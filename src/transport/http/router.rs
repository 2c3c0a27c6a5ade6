use crate::domain::contact::Contact;
use crate::domain::validate::FieldViolation;
use crate::transport::http::errors::ErrorResponse;
use crate::transport::http::handlers::{contacts, health};
use crate::transport::http::types::{ApiResponse, AppState, ContactPayload};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        contacts::create_contact_handler,
        contacts::list_contacts_handler,
        contacts::get_contact_handler,
        contacts::update_contact_handler,
        contacts::delete_contact_handler
    ),
    components(schemas(
        ApiResponse,
        ErrorResponse,
        Contact,
        ContactPayload,
        FieldViolation
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    // Known paths with an unrouted method get the same envelope as unknown paths.
    Router::new()
        .route(
            "/health",
            get(health::healthcheck_handler).fallback(contacts::route_not_found_handler),
        )
        .route(
            "/contacts",
            get(contacts::list_contacts_handler)
                .post(contacts::create_contact_handler)
                .fallback(contacts::route_not_found_handler),
        )
        .route(
            "/contacts/:id",
            get(contacts::get_contact_handler)
                .put(contacts::update_contact_handler)
                .delete(contacts::delete_contact_handler)
                .fallback(contacts::route_not_found_handler),
        )
        .fallback(contacts::route_not_found_handler)
        .with_state(app_state)
}
