pub mod contact_service;
pub mod error;

pub use contact_service::{parse_contact_id, ContactService, EmptyListPolicy};
pub use error::{ServiceError, ServiceResult};
