//! The contact entity and the typed payloads that flow into the service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// System-assigned identifier; never reused.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Set once on insert. Default listing order is by this field, newest first.
    pub created_at: DateTime<Utc>,
}

/// A create payload that has passed validation.
///
/// Only the validation module can build one, so holding a `ContactInput`
/// means every field rule has already been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInput {
    name: String,
    email: String,
    phone: Option<String>,
}

impl ContactInput {
    pub(crate) fn new(name: String, email: String, phone: Option<String>) -> Self {
        Self { name, email, phone }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// What an update does to the stored phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneChange {
    /// Field absent from the payload.
    Keep,
    /// Field was `null` or `""`.
    Clear,
    Set(String),
}

/// An update payload that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChanges {
    name: String,
    email: String,
    phone: PhoneChange,
}

impl ContactChanges {
    pub(crate) fn new(name: String, email: String, phone: PhoneChange) -> Self {
        Self { name, email, phone }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &PhoneChange {
        &self.phone
    }

    /// Overwrites `current` with these changes. `id` and `created_at` are untouched.
    pub fn apply_to(self, mut current: Contact) -> Contact {
        current.name = self.name;
        current.email = self.email;
        match self.phone {
            PhoneChange::Keep => {}
            PhoneChange::Clear => current.phone = None,
            PhoneChange::Set(phone) => current.phone = Some(phone),
        }
        current
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: Option<String>,
}

impl ContactFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    /// The substring to match, or `None` when the listing is unfiltered.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// In-memory equivalent of the storage-side search predicate.
    pub fn matches(&self, contact: &Contact) -> bool {
        match self.term() {
            None => true,
            Some(term) => {
                contact.name.contains(term)
                    || contact.email.contains(term)
                    || contact.phone.as_deref().is_some_and(|p| p.contains(term))
            }
        }
    }
}
