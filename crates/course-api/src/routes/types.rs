//! Request/Response DTOs

use axum::extract::{FromRequest, FromRequestParts};
use course_db::{Course, NewCourse, UserRole};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ApiError;

/// JSON body extractor whose rejections are reported as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor whose rejections are reported as validation errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

// ==================== Limits ====================

/// Maximum email length (RFC 5321 path limit)
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum password length (bounds hashing cost per request)
const MAX_PASSWORD_LENGTH: usize = 256;
const MAX_NAME_LENGTH: usize = 128;
const MAX_TITLE_LENGTH: usize = 200;

fn require_max_length(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field)));
    }
    require_max_length(field, value, max)
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    require_non_empty("Email", email, MAX_EMAIL_LENGTH)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::Validation("Email must look like local@domain".to_string())),
    }
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".to_string()));
    }
    require_max_length("Password", password, MAX_PASSWORD_LENGTH)
}

// ==================== Account Types ====================

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegisterRequest {
    /// Check every field and return the parsed role
    pub fn validate(&self) -> Result<UserRole, ApiError> {
        require_non_empty("Name", &self.name, MAX_NAME_LENGTH)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        UserRole::from_str(&self.role).map_err(|e| ApiError::Validation(e.to_string()))
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Only size caps apply; empty or unknown credentials fail the
    /// credential check like any other wrong pair.
    pub fn validate(&self) -> Result<(), ApiError> {
        require_max_length("Email", &self.email, MAX_EMAIL_LENGTH)?;
        require_max_length("Password", &self.password, MAX_PASSWORD_LENGTH)
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================== Course Types ====================

/// Course create/replace request
#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    pub available_slots: i64,
}

impl CourseRequest {
    pub fn validate(self) -> Result<NewCourse, ApiError> {
        require_non_empty("Title", &self.title, MAX_TITLE_LENGTH)?;
        if self.available_slots < 0 {
            return Err(ApiError::Validation(
                "available_slots cannot be negative".to_string(),
            ));
        }
        Ok(NewCourse {
            title: self.title,
            description: self.description,
            available_slots: self.available_slots,
        })
    }
}

/// Course created response
#[derive(Debug, Serialize)]
pub struct CourseCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Course response
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub available_slots: i64,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            available_slots: course.available_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert_eq!(
            register("Ada", "ada@example.com", "pw", "Admin").validate().unwrap(),
            UserRole::Admin
        );
        assert_eq!(
            register("Bob", "bob@example.com", "pw", "User").validate().unwrap(),
            UserRole::User
        );

        let rejected = [
            register("", "ada@example.com", "pw", "Admin"),
            register("Ada", "", "pw", "Admin"),
            register("Ada", "ada.example.com", "pw", "Admin"),
            register("Ada", "@example.com", "pw", "Admin"),
            register("Ada", "ada@", "pw", "Admin"),
            register("Ada", "ada@example.com", "", "Admin"),
            register("Ada", "ada@example.com", &"x".repeat(257), "Admin"),
            register("Ada", "ada@example.com", "pw", "admin"),
            register("Ada", "ada@example.com", "pw", "Superuser"),
        ];
        for request in rejected {
            assert!(
                matches!(request.validate(), Err(ApiError::Validation(_))),
                "{:?} should be rejected",
                request
            );
        }
    }

    #[test]
    fn test_course_validation() {
        let ok = CourseRequest {
            title: "Rust".to_string(),
            description: String::new(),
            available_slots: 0,
        };
        assert_eq!(ok.validate().unwrap().available_slots, 0);

        let negative = CourseRequest {
            title: "Rust".to_string(),
            description: "d".to_string(),
            available_slots: -1,
        };
        assert!(matches!(negative.validate(), Err(ApiError::Validation(_))));

        let blank = CourseRequest {
            title: "   ".to_string(),
            description: "d".to_string(),
            available_slots: 1,
        };
        assert!(matches!(blank.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_length_limits_count_characters() {
        // 128 two-byte characters fit the name limit even though they are 256 bytes
        let name = "é".repeat(MAX_NAME_LENGTH);
        assert_eq!(name.len(), MAX_NAME_LENGTH * 2);
        assert!(register(&name, "ada@example.com", "pw", "User").validate().is_ok());

        let too_long = "é".repeat(MAX_NAME_LENGTH + 1);
        match register(&too_long, "ada@example.com", "pw", "User").validate() {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Name exceeds maximum length of 128 characters")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_login_validation_only_caps_size() {
        let login = |email: &str, password: &str| LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        assert!(login("ada@example.com", "").validate().is_ok());
        assert!(login("", "pw").validate().is_ok());
        assert!(login("not-an-email", "pw").validate().is_ok());

        assert!(matches!(
            login(&"a".repeat(MAX_EMAIL_LENGTH + 1), "pw").validate(),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            login("ada@example.com", &"x".repeat(MAX_PASSWORD_LENGTH + 1)).validate(),
            Err(ApiError::Validation(_))
        ));
    }
}
