//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::AppError;

/// Require a non-blank value for `field`.
pub fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{field} is required")));
    }

    Ok(())
}

/// Validate email syntax
pub fn validate_email(email: &str) -> Result<(), AppError> {
    require("email", email)?;

    if email.len() > 254 {
        return Err(AppError::InvalidArgument(
            "email must be at most 254 characters long".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(AppError::InvalidArgument(
            "email has an invalid format".to_string(),
        ));
    }

    Ok(())
}

const MAX_DOMESTIC_DIGITS: usize = 11;

/// Reduce a phone number to its canonical digit form.
///
/// Separators and spaces are dropped. A leading `+82` country code is
/// replaced by the domestic trunk prefix `0`, so `+82 10-4589-0000` and
/// `010-4589-0000` both become `01045890000`.
///
/// Query strings decode an unescaped `+` as a space, so a leading `82` is
/// also read as the country code when the number has more digits than any
/// domestic number (11).
pub fn normalize_phone_number(phone_number: &str) -> String {
    let trimmed = phone_number.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if trimmed.starts_with('+') || digits.len() > MAX_DOMESTIC_DIGITS {
        if let Some(national) = digits.strip_prefix("82") {
            return format!("0{}", national.trim_start_matches('0'));
        }
    }

    digits
}

/// Validate a phone number and return its normalized form.
pub fn validate_phone_number(phone_number: &str) -> Result<String, AppError> {
    require("phoneNumber", phone_number)?;

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9 ()\-.]+$").expect("Failed to compile phone number regex")
    });

    if !regex.is_match(phone_number.trim()) {
        return Err(AppError::InvalidArgument(
            "phoneNumber has an invalid format".to_string(),
        ));
    }

    let normalized = normalize_phone_number(phone_number);
    if !(9..=MAX_DOMESTIC_DIGITS).contains(&normalized.len()) {
        return Err(AppError::InvalidArgument(
            "phoneNumber must have 9 to 11 digits".to_string(),
        ));
    }

    Ok(normalized)
}
