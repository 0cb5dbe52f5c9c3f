use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::{ContentType, RETRY_AFTER}, StatusCode},
    HttpResponse
};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::entities::contact_me::RATE_LIMITED_MESSAGE;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    /// `retry_after_secs` is measured on the same clock as `reset_time`.
    RateLimited {
        reset_time: Option<DateTime<Utc>>,
        retry_after_secs: Option<i64>,
    },
    StoreError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::RateLimited { reset_time: Some(at), .. } => {
                write!(f, "Rate limited until {}", at.to_rfc3339())
            }
            AppError::RateLimited { reset_time: None, .. } => write!(f, "Rate limited"),
            AppError::StoreError(msg) => write!(f, "Store error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());

        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": errors
                })
            }
            AppError::RateLimited { reset_time, retry_after_secs } => {
                if let Some(wait) = retry_after_secs {
                    builder.insert_header((RETRY_AFTER, (*wait).max(1).to_string()));
                }
                serde_json::json!({
                    "success": false,
                    "message": RATE_LIMITED_MESSAGE,
                    "reset_time": reset_time.as_ref().map(|at| at.to_rfc3339())
                })
            }
            AppError::StoreError(_) => {
                // Details stay in the logs.
                serde_json::json!({
                    "success": false,
                    "message": "Internal server error. Please try again later."
                })
            }
        };
        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreError(format!("Database error: {}", err))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::StoreError(format!("Migration error: {}", err))
    }
}

/// Failure of the best-effort notification channel. Never surfaced to
/// clients.
#[derive(Debug, Display)]
pub enum NotifyError {
    #[display("Notification transport failed: {_0}")]
    Transport(String),

    #[display("Notification endpoint rejected the request with status {_0}")]
    Rejected(u16),

    #[display("Notification timed out after {_0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use chrono::TimeDelta;

    async fn body_json(err: &AppError) -> serde_json::Value {
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_rt::test]
    async fn rate_limited_response_carries_reset_hint() {
        let reset_time = Utc::now() + TimeDelta::minutes(5);
        let err = AppError::RateLimited {
            reset_time: Some(reset_time),
            retry_after_secs: Some(300),
        };

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "300");

        let body = body_json(&err).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["reset_time"], reset_time.to_rfc3339());
    }

    #[test]
    fn retry_after_never_drops_below_one_second() {
        let err = AppError::RateLimited {
            reset_time: Some(Utc::now()),
            retry_after_secs: Some(0),
        };
        assert_eq!(err.error_response().headers().get(RETRY_AFTER).unwrap(), "1");
    }

    #[actix_rt::test]
    async fn store_error_hides_details() {
        let err = AppError::StoreError("connection refused".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(&err).await;
        assert_eq!(body["success"], false);
        assert!(!body["message"].as_str().unwrap().contains("connection refused"));
    }
}
