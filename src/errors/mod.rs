//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
            timestamp: Utc::now(),
        })
    }

    /// Wrap a successful result with a human-readable message.
    pub fn success_with_message(data: T, message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            errors: Vec::new(),
            timestamp: Utc::now(),
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(message: &str, errors: Vec<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
            errors,
            timestamp: Utc::now(),
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    Invalid(ValidationErrors),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error retrieving dashboard data: {0}")]
    DataAccess(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error represents an auth failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Invalid(errors)
    }
}

/// Flatten nested validator errors into one message per failed rule.
///
/// Messages are sorted so the envelope is deterministic regardless of the
/// HashMap iteration order inside `ValidationErrors`.
fn flatten_validation(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_validation(errors, &mut messages);
    messages.sort();
    messages
}

fn collect_validation(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    match &error.message {
                        Some(message) => out.push(message.to_string()),
                        None => out.push(format!("{field}: {}", error.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validation(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_validation(nested, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), Vec::new()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), Vec::new()),
            AppError::Invalid(validation_errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                flatten_validation(validation_errors),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
                Vec::new(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), Vec::new()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
            // Dashboard aggregation failures surface the underlying message
            // in the envelope, matching the contract of the summary endpoint.
            AppError::DataAccess(_) => {
                tracing::error!(error = %self, "Dashboard data access error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                    Vec::new(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: Some(message),
            errors,
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "hello");
        assert!(json["message"].is_null());
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn api_response_success_with_message() {
        let response = ApiResponse::success_with_message(true, "Stock updated successfully");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], true);
        assert_eq!(json["message"], "Stock updated successfully");
    }

    #[test]
    fn api_response_error() {
        let response = ApiResponse::<()>::error("Item not found", vec![]);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Item not found");
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("product".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("ID mismatch".to_string());
        assert_eq!(err.to_string(), "Validation error: ID mismatch");
    }

    #[test]
    fn data_access_error_carries_message() {
        let err = AppError::DataAccess("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Error retrieving dashboard data: connection refused"
        );
    }

    #[test]
    fn app_error_from_sqlx() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let err: AppError = sqlx_err.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 0, message = "Quantity cannot be negative"))]
        quantity: i32,
    }

    #[test]
    fn validation_errors_flatten_to_sorted_messages() {
        let sample = Sample {
            name: String::new(),
            quantity: -1,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        match &err {
            AppError::Invalid(errors) => {
                let messages = flatten_validation(errors);
                assert_eq!(
                    messages,
                    vec![
                        "Name is required".to_string(),
                        "Quantity cannot be negative".to_string(),
                    ]
                );
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
