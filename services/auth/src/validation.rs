//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ApiError;

fn invalid(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

/// Reject the request when any of the named fields is blank
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ApiError::BadRequest(format!("{} is required", name))),
        None => Ok(()),
    }
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 3 {
        return Err(invalid("Username must be at least 3 characters long"));
    }

    if username.len() > 32 {
        return Err(invalid("Username must be at most 32 characters long"));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(invalid(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > 254 {
        return Err(invalid("Email must be at most 254 characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(invalid("Invalid email format"));
    }

    Ok(())
}

/// Validate a new password: anything non-blank up to 128 characters
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.trim().is_empty() {
        return Err(invalid("password is required"));
    }

    if password.chars().count() > 128 {
        return Err(invalid("Password must be at most 128 characters long"));
    }

    Ok(())
}
