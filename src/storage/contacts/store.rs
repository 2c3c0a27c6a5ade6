use crate::domain::contact::{Contact, ContactFilter, ContactInput};
use crate::storage::error::StorageError;
use async_trait::async_trait;

/// Name of the storage-level unique constraint on `contacts.email`.
///
/// Every store reports duplicate emails under this name so the HTTP layer can
/// surface the race backstop as a conflict.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "contacts_email_key";

/// Persistence collaborator for contacts.
///
/// Implementations assign `id` and `created_at` on insert and enforce the
/// email unique constraint themselves.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Inserts a new row and returns it with its generated fields.
    async fn insert(&self, input: &ContactInput) -> Result<Contact, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, StorageError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError>;

    /// Rows matching `filter`, newest first (ties broken by id, descending).
    async fn search(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StorageError>;

    /// Overwrites `name`, `email` and `phone` of the row with `contact.id`.
    /// Returns `None` when no such row exists.
    async fn update(&self, contact: &Contact) -> Result<Option<Contact>, StorageError>;

    /// Removes the row and returns the number of rows affected.
    async fn delete(&self, id: i64) -> Result<u64, StorageError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StorageError>;
}
