//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type across the workspace, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (required minimum, offending field, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a missing required field error
    pub fn required(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RequiredField, msg)
    }

    /// Create an invalid amount error
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidAmount, msg)
    }

    /// Create an out of range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValueOutOfRange, msg)
    }

    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        AppError::validation(errors.to_string()).with_detail("fields", fields)
    }
}

/// Unified API response envelope
///
/// Every endpoint answers with the same shape:
/// - `success`: whether the operation succeeded
/// - `code`: numeric error code (0 for success)
/// - `message`: human-readable message
/// - `data`: response payload (on success)
/// - `count`: number of items (list endpoints)
/// - `error`: snake_case error kind (on failure)
/// - `details`: additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: Some(data),
            count: None,
            error: None,
            details: None,
        }
    }

    /// Attach an item count (list endpoints)
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: None,
            count: None,
            error: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            code: err.code.code(),
            message: err.message.clone(),
            data: None,
            count: None,
            error: Some(err.code.kind().to_string()),
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            code: err.code.code(),
            message: err.message,
            data: None,
            count: None,
            error: Some(err.code.kind().to_string()),
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors never leak their detail to the client
        let body = if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            ApiResponse::<()>::error(&AppError::new(self.code))
        } else {
            ApiResponse::<()>::error(&self)
        };

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = ErrorCode::try_from(self.code)
            .map(|c| c.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::PromoCodeInvalid);
        assert_eq!(err.code, ErrorCode::PromoCodeInvalid);
        assert_eq!(err.message, "Invalid promo code");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::with_message(
            ErrorCode::PromoMinimumNotMet,
            "Minimum order amount of 500 required for this promo",
        )
        .with_detail("min_order_amount", 500.0);

        let details = err.details.unwrap();
        assert_eq!(details.get("min_order_amount").unwrap(), 500.0);
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        assert_eq!(AppError::required("x").code, ErrorCode::RequiredField);
        assert_eq!(AppError::invalid_amount("x").code, ErrorCode::InvalidAmount);
        assert_eq!(AppError::out_of_range("x").code, ErrorCode::ValueOutOfRange);
        assert_eq!(AppError::invalid_format("x").code, ErrorCode::InvalidFormat);

        let err = AppError::not_found("Listing");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Listing not found");
    }

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success_with_message("Listings retrieved successfully", 42)
            .with_count(1);
        assert!(response.success);
        assert_eq!(response.code, 0);
        assert_eq!(response.data, Some(42));
        assert_eq!(response.count, Some(1));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::new(ErrorCode::PromoCodeExpired);
        let response = ApiResponse::<()>::error(&err);

        assert!(!response.success);
        assert_eq!(response.code, 1002);
        assert_eq!(response.message, "Promo code has expired");
        assert_eq!(response.error.as_deref(), Some("expired"));
    }

    #[test]
    fn test_api_response_serialize_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::<()>::ok("Promo code deleted successfully")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], 0);
        assert!(json.get("data").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("count").is_none());
    }
}
