//! API models for stored records and request and response payloads

use chrono::{DateTime, NaiveDate, Utc};
use common::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{
    Validate, ValidationErrors, Violations, validate_birth_date, validate_email, validate_name,
    validate_password,
};

pub mod tweet;

/// User record as persisted in the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Record for User {
    const KIND: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    /// Ids and emails are both unique; emails compare case-insensitively.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.id == other.id || self.email.eq_ignore_ascii_case(&other.email)
    }
}

/// Request for user registration
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Violations::default();
        violations
            .check("email", validate_email(&self.email))
            .check("password", validate_password(&self.password))
            .check("first_name", validate_name(&self.first_name))
            .check("last_name", validate_name(&self.last_name))
            .check(
                "birth_date",
                validate_birth_date(self.birth_date, Utc::now().date_naive()),
            );
        violations.finish()
    }
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Violations::default();
        violations
            .check("email", validate_email(&self.email))
            .check("password", validate_password(&self.password));
        violations.finish()
    }
}

/// Request replacing a user's profile.
///
/// The id, password and registration time are kept from the stored record.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Violations::default();
        violations
            .check("email", validate_email(&self.email))
            .check("first_name", validate_name(&self.first_name))
            .check("last_name", validate_name(&self.last_name))
            .check(
                "birth_date",
                validate_birth_date(self.birth_date, Utc::now().date_naive()),
            );
        violations.finish()
    }
}

/// Response for user operations; never carries the password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            birth_date: None,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_users_conflict_on_email_regardless_of_case() {
        let a = user("a@b.com");
        assert!(a.conflicts_with(&user("A@B.com")));
        assert!(!a.conflicts_with(&user("c@d.com")));
    }

    #[test]
    fn test_user_response_has_no_password() {
        let response = UserResponse::from(user("a@b.com"));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn test_signup_request_reports_all_fields() {
        let request: SignupRequest = serde_json::from_value(serde_json::json!({
            "email": "bad",
            "password": "short",
            "first_name": "",
            "last_name": "B",
            "birth_date": "2999-01-01"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.0.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["email", "password", "first_name", "birth_date"]);
    }
}
