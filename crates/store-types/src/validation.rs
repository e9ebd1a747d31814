//! Field-level checks applied to write payloads before they reach a
//! repository. Every check returns the parsed value or a [`ValidationError`].

use thiserror::Error;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PASSWORD_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_STATUS_LEN: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("invalid email format")]
    InvalidEmail,

    #[error("{field} must be a positive integer")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{entity} {id} does not exist")]
    UnknownReference { entity: &'static str, id: i64 },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Required text: present, not blank, and at most `max` characters long.
/// The value is kept as submitted.
pub fn required_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<String> {
    let value = value.ok_or(ValidationError::Required { field })?;
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

pub fn email(value: Option<String>) -> ValidationResult<String> {
    let value = required_text("email", value, MAX_EMAIL_LEN)?;
    if !value.contains('@') || !value.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value)
}

pub fn positive_id(field: &'static str, value: Option<i64>) -> ValidationResult<i64> {
    match value {
        None => Err(ValidationError::Required { field }),
        Some(v) if v <= 0 => Err(ValidationError::NotPositive { field }),
        Some(v) => Ok(v),
    }
}

pub fn finite_number(field: &'static str, value: Option<f64>) -> ValidationResult<f64> {
    match value {
        None => Err(ValidationError::Required { field }),
        Some(v) if !v.is_finite() => Err(ValidationError::NotFinite { field }),
        Some(v) => Ok(v),
    }
}
