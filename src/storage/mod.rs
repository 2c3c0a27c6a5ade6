pub mod contacts;
pub mod error;

pub use contacts::{ContactStore, InMemoryContactStore, PgContactStore, EMAIL_UNIQUE_CONSTRAINT};
pub use error::StorageError;
