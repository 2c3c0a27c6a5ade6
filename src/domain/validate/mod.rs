pub mod validator;

pub use validator::{
    is_valid_email, is_valid_phone, validate_contact, validate_create, validate_update,
    FieldViolation, ValidationFailure,
};
