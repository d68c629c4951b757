//! Unified error system for the booking marketplace
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified `{success, message, data?, error?}` envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Promo code errors
//! - 2xxx: Listing errors
//! - 3xxx: Checkout errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::PromoCodeExpired);
//! assert_eq!(err.message, "Promo code has expired");
//!
//! let err = AppError::required("Promo code is required").with_detail("field", "code");
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! assert_eq!(response.error.as_deref(), Some("missing_field"));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
