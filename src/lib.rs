pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ContactService, EmptyListPolicy, ServiceError, ServiceResult};
pub use domain::{Contact, ContactChanges, ContactFilter, ContactInput, PhoneChange};
pub use infra::config::{AppConfig, StoreKind};
pub use storage::{ContactStore, InMemoryContactStore, PgContactStore, StorageError};
