//! Account form validation. Each check returns the first failing field.

use once_cell::sync::Lazy;
use regex::Regex;
use wisewallet_domain::{Field, ValidationError};

use crate::session::DEFAULT_USERNAME;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .ok()
});

static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(\+[0-9]+[\- .]*)?(\([0-9]+\)[\- .]*)?([0-9][0-9\- .]+[0-9])$").ok()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.as_ref().is_some_and(|re| re.is_match(phone))
}

/// Rejects blank names and the name of the logged-out wallet.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::new(Field::Username, "Username required"));
    }
    if username.eq_ignore_ascii_case(DEFAULT_USERNAME) {
        return Err(ValidationError::new(
            Field::Username,
            "That username is reserved",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !is_valid_email(email) {
        return Err(ValidationError::new(Field::Email, "Valid email required"));
    }
    Ok(())
}

/// An empty phone number is accepted; anything else must look like one.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !phone.is_empty() && !is_valid_phone(phone) {
        return Err(ValidationError::new(
            Field::Phone,
            "Valid phone number required",
        ));
    }
    Ok(())
}

pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            Field::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if password != confirmation {
        return Err(ValidationError::new(
            Field::ConfirmPassword,
            "Passwords don't match",
        ));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::new(Field::Password, "Password required"));
    }
    Ok(())
}
