use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 24;

static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").unwrap());
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").unwrap());
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!@#$%^&]").unwrap());

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password must be longer than 8 characters")]
    TooShort,
    #[error("Password must be less than 24 characters")]
    TooLong,
    #[error("Password must not start or end with empty spaces")]
    SurroundingWhitespace,
    #[error("Password must contain 1 upper case, lower case, number and special character")]
    NotComplex,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Email is invalid")]
pub struct InvalidEmail;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing '{0}' in request body")]
pub struct MissingField(pub String);

/// A patch body that names none of the fields the resource accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Request body must contain '{0}'")]
pub struct EmptyPatch(pub String);

/// A required text field that was supplied but holds only whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' must not be empty")]
pub struct BlankField(pub String);

/// Check a candidate password against the account policy. Rules are applied in order
/// and the first failure is reported.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    if password.starts_with(char::is_whitespace) || password.ends_with(char::is_whitespace) {
        return Err(PasswordError::SurroundingWhitespace);
    }

    let complex = LOWERCASE.is_match(password)
        && UPPERCASE.is_match(password)
        && DIGIT.is_match(password)
        && SPECIAL.is_match(password);
    if !complex {
        return Err(PasswordError::NotComplex);
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), InvalidEmail> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(InvalidEmail)
    }
}

/// Unwrap a required body field. Presence is what counts: `Some("")` passes here and is
/// left to field-specific checks.
pub fn require_field<T>(value: Option<T>, name: &str) -> Result<T, MissingField> {
    value.ok_or_else(|| MissingField(name.to_string()))
}

/// Like [`require_field`] for registration, where an empty string is as good as absent.
pub fn require_non_empty(value: Option<String>, name: &str) -> Result<String, MissingField> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(MissingField(name.to_string())),
    }
}

/// Unwrap the single field of a one-field patch body.
pub fn require_patch_field<T>(value: Option<T>, name: &str) -> Result<T, EmptyPatch> {
    value.ok_or_else(|| EmptyPatch(name.to_string()))
}

pub fn require_not_blank(value: &str, name: &str) -> Result<(), BlankField> {
    if value.trim().is_empty() {
        Err(BlankField(name.to_string()))
    } else {
        Ok(())
    }
}
