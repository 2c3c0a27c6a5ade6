pub mod cors;
pub mod errors;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod contacts;
    pub mod health;
}

pub use cors::cors_layer;
pub use errors::{ErrorMapper, ErrorMessage, ErrorResponse};
pub use router::{create_router, ApiDoc};
pub use types::{AppState, DeleteResponse};
