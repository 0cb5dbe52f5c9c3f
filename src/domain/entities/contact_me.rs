use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MAX_MESSAGE_LENGTH: usize = 1000;

pub const ACCEPTED_MESSAGE: &str = "Message sent successfully! We will get back to you soon.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many attempts. Please try again in a few minutes.";

// ───── Request Models ───────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactMeForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_message"))]
    pub message: String,
}

/// Transport-level facts about the sender
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub identifier: String,
    pub user_agent: Option<String>,
}

// ───── Stored Models ────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Submission {
    /// Builds the record for an already validated and admitted form.
    pub fn new(form: ContactMeForm, client: &ClientInfo, created_at: DateTime<Utc>) -> Self {
        Submission {
            id: Uuid::new_v4(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            message: form.message.trim().to_string(),
            created_at,
            ip_address: Some(client.identifier.clone()),
            user_agent: client.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFilter {
    All,
    Since(DateTime<Utc>),
}

/// Fields handed to the notifier
#[derive(Debug, Clone, Serialize)]
pub struct ContactNotification {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<&Submission> for ContactNotification {
    fn from(submission: &Submission) -> Self {
        ContactNotification {
            name: submission.name.clone(),
            email: submission.email.clone(),
            message: submission.message.clone(),
            submitted_at: submission.created_at,
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMeResponse {
    pub success: bool,
    pub message: String,
}

impl ContactMeResponse {
    pub fn accepted() -> Self {
        ContactMeResponse {
            success: true,
            message: ACCEPTED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactStats {
    pub total_submissions: i64,
    pub today_submissions: i64,
}

// ───── Validators ───────────────────────────────────────────────────
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(new_validation_error("name_required", "Name is required"));
    }
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(length_error(MIN_NAME_LENGTH, MAX_NAME_LENGTH, "Name"));
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    let len = message.trim().chars().count();
    if len == 0 {
        return Err(new_validation_error("message_required", "Message is required"));
    }
    if !(MIN_MESSAGE_LENGTH..=MAX_MESSAGE_LENGTH).contains(&len) {
        return Err(length_error(MIN_MESSAGE_LENGTH, MAX_MESSAGE_LENGTH, "Message"));
    }
    Ok(())
}

fn length_error(min: usize, max: usize, label: &str) -> ValidationError {
    let mut err = ValidationError::new("length");
    err.message = Some(Cow::Owned(format!(
        "{label} must be between {min} and {max} characters"
    )));
    err
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactMeForm {
        ContactMeForm {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    fn failing_fields(form: &ContactMeForm) -> Vec<String> {
        let mut fields: Vec<String> = form
            .validate()
            .err()
            .map(|errors| errors.field_errors().keys().map(|k| k.to_string()).collect())
            .unwrap_or_default();
        fields.sort();
        fields
    }

    #[test]
    fn rejects_nine_character_message() {
        let form = form("Al", "a@b.com", "123456789");
        assert_eq!(failing_fields(&form), vec!["message"]);
    }

    #[test]
    fn accepts_inclusive_lower_bounds() {
        let form = form("Al", "a@b.com", "0123456789");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn accepts_inclusive_upper_bounds() {
        let form = form(&"n".repeat(100), "a@b.com", &"m".repeat(1000));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_values_past_upper_bounds() {
        let form = form(&"n".repeat(101), "a@b.com", &"m".repeat(1001));
        assert_eq!(failing_fields(&form), vec!["message", "name"]);
    }

    #[test]
    fn lengths_are_measured_after_trimming() {
        let form = form("  A  ", "a@b.com", "   short     ");
        assert_eq!(failing_fields(&form), vec!["message", "name"]);
    }

    #[test]
    fn reports_every_failing_field() {
        let form = form("", "not-an-email", "");
        assert_eq!(failing_fields(&form), vec!["email", "message", "name"]);
    }

    #[test]
    fn submission_stores_trimmed_values() {
        let client = ClientInfo {
            identifier: "203.0.113.7".into(),
            user_agent: Some("curl/8.0".into()),
        };
        let now = Utc::now();
        let submission = Submission::new(form("  Ada  ", "ada@example.com", "  Hello there!  "), &client, now);

        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.message, "Hello there!");
        assert_eq!(submission.created_at, now);
        assert_eq!(submission.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(submission.user_agent.as_deref(), Some("curl/8.0"));
    }
}
