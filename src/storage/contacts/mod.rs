pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryContactStore;
pub use postgres::PgContactStore;
pub use store::{ContactStore, EMAIL_UNIQUE_CONSTRAINT};
