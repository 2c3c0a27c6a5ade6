// Field rules for contact payloads.

use crate::domain::contact::{Contact, ContactChanges, ContactInput, PhoneChange};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::OnceLock;
use thiserror::Error;
use utoipa::ToSchema;

const NAME: &str = "name";
const EMAIL: &str = "email";
const PHONE: &str = "phone";
const ALLOWED_FIELDS: &[&str] = &[NAME, EMAIL, PHONE];

const PHONE_PATTERN: &str =
    r"^\+?[0-9]{1,4}?[-.\s]?\(?[0-9]{1,3}?\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,9}$";
// Local part and labels accept any Unicode letter or digit; the TLD is letters or punycode.
const EMAIL_PATTERN: &str = r#"^[\p{L}\p{N}.!#$%&'*+/=?^_`{|}~-]+@[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?)*\.(?:\p{L}{2,}|[xX][nN]--[A-Za-z0-9-]{2,})$"#;

/// A single broken field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every field rule a payload broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field rule(s) violated", .violations.len())]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    pub fn has_message(&self, message: &str) -> bool {
        self.violations.iter().any(|v| v.message == message)
    }
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationFailure> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationFailure { violations: self.0 })
        }
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Create,
    Update,
}

impl Mode {
    fn empty_name(self) -> &'static str {
        match self {
            Mode::Create => "Name is required",
            Mode::Update => "Name cannot be empty",
        }
    }

    fn empty_email(self) -> &'static str {
        match self {
            Mode::Create => "Email is required",
            Mode::Update => "Email cannot be empty",
        }
    }
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Whether `phone` matches the permissive international phone pattern.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Whether `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.len() > 64
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }
    email_regex().is_match(email)
}

fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn as_object(payload: &JsonValue) -> Result<&Map<String, JsonValue>, ValidationFailure> {
    payload.as_object().ok_or_else(|| ValidationFailure {
        violations: vec![FieldViolation {
            field: "<body>".to_string(),
            message: "Request body must be a JSON object".to_string(),
        }],
    })
}

fn check_name(value: Option<&JsonValue>, mode: Mode, out: &mut Violations) -> Option<String> {
    let text = value.and_then(JsonValue::as_str);
    if text.is_none() {
        out.push(NAME, "Name must be a string");
    }
    if is_blank(value) {
        out.push(NAME, mode.empty_name());
        return None;
    }
    text.map(str::to_owned)
}

fn check_email(value: Option<&JsonValue>, mode: Mode, out: &mut Violations) -> Option<String> {
    let text = value.and_then(JsonValue::as_str);
    let valid = text.is_some_and(is_valid_email);
    if !valid {
        out.push(EMAIL, "Email is invalid");
    }
    if is_blank(value) {
        out.push(EMAIL, mode.empty_email());
    }
    if valid {
        text.map(str::to_owned)
    } else {
        None
    }
}

fn check_phone_text(value: &JsonValue, out: &mut Violations) -> Option<String> {
    match value.as_str() {
        Some(s) if is_valid_phone(s) => Some(s.to_owned()),
        _ => {
            out.push(PHONE, "Phone number is invalid");
            None
        }
    }
}

fn check_unknown_fields(obj: &Map<String, JsonValue>, out: &mut Violations) {
    for key in obj.keys() {
        if !ALLOWED_FIELDS.contains(&key.as_str()) {
            out.push(key, format!("property {} should not exist", key));
        }
    }
}

/// Validates a create payload (`{name, email, phone?}`).
///
/// `phone` may be absent or `null`; any other value must be a string that
/// matches the phone pattern, so `""` is rejected here.
pub fn validate_create(payload: &JsonValue) -> Result<ContactInput, ValidationFailure> {
    let obj = as_object(payload)?;
    let mut out = Violations::default();

    let name = check_name(obj.get(NAME), Mode::Create, &mut out);
    let email = check_email(obj.get(EMAIL), Mode::Create, &mut out);
    let phone = match obj.get(PHONE) {
        None | Some(JsonValue::Null) => None,
        Some(value) => check_phone_text(value, &mut out),
    };
    check_unknown_fields(obj, &mut out);

    out.finish(|| {
        ContactInput::new(
            name.unwrap_or_default(),
            email.unwrap_or_default(),
            phone,
        )
    })
}

/// Validates an update payload (`{name, email, phone?}`).
///
/// An absent `phone` keeps the stored value; `null` or `""` clears it.
pub fn validate_update(payload: &JsonValue) -> Result<ContactChanges, ValidationFailure> {
    let obj = as_object(payload)?;
    let mut out = Violations::default();

    let name = check_name(obj.get(NAME), Mode::Update, &mut out);
    let email = check_email(obj.get(EMAIL), Mode::Update, &mut out);
    let phone = match obj.get(PHONE) {
        None => PhoneChange::Keep,
        Some(JsonValue::Null) => PhoneChange::Clear,
        Some(JsonValue::String(s)) if s.is_empty() => PhoneChange::Clear,
        Some(value) => check_phone_text(value, &mut out)
            .map(PhoneChange::Set)
            .unwrap_or(PhoneChange::Keep),
    };
    check_unknown_fields(obj, &mut out);

    out.finish(|| {
        ContactChanges::new(
            name.unwrap_or_default(),
            email.unwrap_or_default(),
            phone,
        )
    })
}

/// Re-checks the field rules on a fully merged record before it is written.
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationFailure> {
    let mut out = Violations::default();
    if contact.name.is_empty() {
        out.push(NAME, Mode::Update.empty_name());
    }
    if !is_valid_email(&contact.email) {
        out.push(EMAIL, "Email is invalid");
    }
    if contact.email.is_empty() {
        out.push(EMAIL, Mode::Update.empty_email());
    }
    if let Some(phone) = contact.phone.as_deref() {
        if !phone.is_empty() && !is_valid_phone(phone) {
            out.push(PHONE, "Phone number is invalid");
        }
    }
    out.finish(|| ())
}
