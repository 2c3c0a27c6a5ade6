//! In-process contact store for local runs and tests.

use crate::domain::contact::{Contact, ContactFilter, ContactInput};
use crate::storage::contacts::store::{ContactStore, EMAIL_UNIQUE_CONSTRAINT};
use crate::storage::error::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Contact>,
}

impl Table {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|c| c.email == email && Some(c.id) != except_id)
    }
}

fn duplicate_email(email: &str) -> StorageError {
    StorageError::UniqueViolation {
        constraint: Some(EMAIL_UNIQUE_CONSTRAINT.to_string()),
        message: format!("duplicate key value violates unique constraint on email {}", email),
    }
}

/// Contact store that keeps rows in memory. Ids are never reused.
#[derive(Default)]
pub struct InMemoryContactStore {
    table: RwLock<Table>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert(&self, input: &ContactInput) -> Result<Contact, StorageError> {
        let mut table = self.table.write().await;
        if table.email_taken(input.email(), None) {
            return Err(duplicate_email(input.email()));
        }
        table.last_id += 1;
        let contact = Contact {
            id: table.last_id,
            name: input.name().to_string(),
            email: input.email().to_string(),
            phone: input.phone().map(str::to_owned),
            created_at: Utc::now(),
        };
        table.rows.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, StorageError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|c| c.email == email).cloned())
    }

    async fn search(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StorageError> {
        let table = self.table.read().await;
        let mut found: Vec<Contact> = table
            .rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn update(&self, contact: &Contact) -> Result<Option<Contact>, StorageError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&contact.id) {
            return Ok(None);
        }
        if table.email_taken(&contact.email, Some(contact.id)) {
            return Err(duplicate_email(&contact.email));
        }
        let Some(row) = table.rows.get_mut(&contact.id) else {
            return Ok(None);
        };
        row.name = contact.name.clone();
        row.email = contact.email.clone();
        row.phone = contact.phone.clone();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<u64, StorageError> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
