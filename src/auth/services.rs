use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field-level problems shown next to an input. The store never sees these;
/// they exist only to give the user feedback before a store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailMalformed,
    #[error("Please enter your password")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9_.-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z0-9]{2,6}$")
                .unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Live check while typing: an empty field is not an error yet.
pub fn check_email_format(email: &str) -> Option<ValidationError> {
    if !email.is_empty() && !is_valid_email(email) {
        Some(ValidationError::EmailMalformed)
    } else {
        None
    }
}

/// Live check while typing: an empty field is not an error yet. Length is
/// counted in Unicode scalar values, not UTF-16 code units.
pub fn check_password_format(password: &str) -> Option<ValidationError> {
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        Some(ValidationError::PasswordTooShort)
    } else {
        None
    }
}

/// Full check on submit. Emptiness is reported before format so the user
/// sees "required" rather than "malformed" for a blank field.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    check_email_format(email).map_or(Ok(()), Err)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    check_password_format(password).map_or(Ok(()), Err)
}
