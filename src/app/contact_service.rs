//! The contact service.
//!
//! Sits between the HTTP handlers and the store. It is responsible for:
//! 1.  Rejecting non-positive ids before any storage lookup.
//! 2.  Keeping emails unique (checked before create, and before update when
//!     the email changes). The store's unique constraint backs this up when
//!     two requests race.
//! 3.  Writing every mutation straight through to the store.

use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::contact::{Contact, ContactChanges, ContactFilter, ContactInput};
use crate::domain::validate::validate_contact;
use crate::storage::ContactStore;
use std::str::FromStr;
use std::sync::Arc;

/// What `find_all` does when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyListPolicy {
    /// Fail with not-found.
    #[default]
    NotFound,
    /// Return an empty list.
    EmptyOk,
}

impl FromStr for EmptyListPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not_found" | "404" => Ok(Self::NotFound),
            "empty" | "empty_ok" | "200" => Ok(Self::EmptyOk),
            other => Err(format!("unknown empty list policy '{}'", other)),
        }
    }
}

/// Parses a path id. Sign and range are checked by the service, not here.
pub fn parse_contact_id(raw: &str) -> ServiceResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::bad_request("Validation failed (numeric string is expected)"))
}

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
    empty_list: EmptyListPolicy,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>, empty_list: EmptyListPolicy) -> Self {
        Self { store, empty_list }
    }

    async fn ensure_email_available(&self, email: &str, message: &str) -> ServiceResult<()> {
        if self.store.find_by_email(email).await?.is_some() {
            tracing::debug!(email, "email already in use");
            return Err(ServiceError::conflict(message));
        }
        Ok(())
    }

    /// Inserts a validated contact after checking its email is free.
    pub async fn create(&self, input: ContactInput) -> ServiceResult<Contact> {
        self.ensure_email_available(input.email(), "Contact with this email already exists")
            .await?;
        let contact = self.store.insert(&input).await?;
        tracing::info!(id = contact.id, "contact created");
        Ok(contact)
    }

    /// Lists contacts, newest first, optionally narrowed by a substring search.
    pub async fn find_all(&self, filter: &ContactFilter) -> ServiceResult<Vec<Contact>> {
        let contacts = self.store.search(filter).await?;
        tracing::debug!(count = contacts.len(), search = ?filter.term(), "contacts listed");
        if contacts.is_empty() && self.empty_list == EmptyListPolicy::NotFound {
            return Err(ServiceError::not_found("No contacts found"));
        }
        Ok(contacts)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Contact> {
        if id <= 0 {
            return Err(ServiceError::bad_request("ID must be a positive number"));
        }
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::contact_not_found(id))
    }

    /// Overwrites a contact. The uniqueness check only runs when the email changes.
    pub async fn update(&self, id: i64, changes: ContactChanges) -> ServiceResult<Contact> {
        let current = self.find_one(id).await?;
        if changes.email() != current.email {
            self.ensure_email_available(changes.email(), "Email already in use")
                .await?;
        }

        let merged = changes.apply_to(current);
        validate_contact(&merged)?;

        let updated = self
            .store
            .update(&merged)
            .await?
            .ok_or_else(|| ServiceError::contact_not_found(id))?;
        tracing::info!(id, "contact updated");
        Ok(updated)
    }

    /// Removes a contact and returns what it looked like before removal.
    pub async fn delete(&self, id: i64) -> ServiceResult<Contact> {
        let snapshot = self.find_one(id).await?;
        if self.store.delete(id).await? == 0 {
            return Err(ServiceError::contact_not_found(id));
        }
        tracing::info!(id, "contact deleted");
        Ok(snapshot)
    }

    pub async fn check_health(&self) -> ServiceResult<()> {
        self.store.ping().await?;
        Ok(())
    }
}
