//! Contact domain: the entity, its typed payloads and the field rules.

pub mod contact;
pub mod validate;

pub use contact::{Contact, ContactChanges, ContactFilter, ContactInput, PhoneChange};
pub use validate::{FieldViolation, ValidationFailure};
