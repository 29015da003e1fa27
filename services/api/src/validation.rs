//! Input validation utilities
//!
//! Field rules run once at the request boundary, before any store access.
//! Lengths are counted in characters, not bytes.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 64;
pub const CONTENT_MAX_LEN: usize = 256;

/// A single rule violation on a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found on one request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Shorthand for a single violation
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field,
            message: message.into(),
        }])
    }
}

/// Request payloads that carry field rules
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Collects field violations while a payload is checked
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.0.push(FieldError { field, message });
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Validate a first or last name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.trim().chars().count() > NAME_MAX_LEN {
        return Err(format!(
            "Name must be at most {NAME_MAX_LEN} characters long"
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(format!(
            "Email must be at most {EMAIL_MAX_LEN} characters long"
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let len = password.chars().count();

    if len < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters long"
        ));
    }

    if len > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password must be at most {PASSWORD_MAX_LEN} characters long"
        ));
    }

    Ok(())
}

/// Validate tweet content
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }

    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(format!(
            "Content must be at most {CONTENT_MAX_LEN} characters long"
        ));
    }

    Ok(())
}

/// Validate an optional birth date against today's date
pub fn validate_birth_date(birth_date: Option<NaiveDate>, today: NaiveDate) -> Result<(), String> {
    match birth_date {
        Some(date) if date > today => Err("Birth date cannot be in the future".to_string()),
        _ => Ok(()),
    }
}
