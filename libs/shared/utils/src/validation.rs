// Form validation shared by the intake steps.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use shared_models::{FieldError, PatientInfo};

pub const NAME_REQUIRED: &str = "Full name is required.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const INVALID_PHONE: &str = "Please enter a valid 10-digit phone number.";

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$")
        .expect("phone pattern compiles")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))"#,
        r#"@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    ))
    .expect("email pattern compiles")
});

/// Ten digits, optionally with the area code in parentheses and `-`, `.` or
/// space separators.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(&email.to_lowercase())
}

/// Returns every field-level problem with the submitted contact details.
pub fn validate_patient_info(info: &PatientInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if info.name.trim().is_empty() {
        errors.push(FieldError::new("name", NAME_REQUIRED));
    }
    if !validate_email(&info.email) {
        errors.push(FieldError::new("email", INVALID_EMAIL));
    }
    if !validate_phone(&info.phone) {
        errors.push(FieldError::new("phone", INVALID_PHONE));
    }

    if !errors.is_empty() {
        debug!("Patient info rejected with {} field errors", errors.len());
    }

    errors
}

/// Trims free text and rejects it when nothing is left.
pub fn require_text(field: &str, value: &str, message: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FieldError::new(field, message))
    } else {
        Ok(trimmed.to_string())
    }
}
