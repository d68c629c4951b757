//! Unified error codes for the booking marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Promo code errors
//! - 2xxx: Listing errors
//! - 3xxx: Checkout errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can branch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Amount is missing, zero or negative
    InvalidAmount = 9,
    /// Value is not one of the accepted variants
    InvalidEnum = 10,

    // ==================== 1xxx: Promo ====================
    /// No active promo code matches (also used for inactive codes)
    PromoCodeInvalid = 1001,
    /// Promo code validity window has passed
    PromoCodeExpired = 1002,
    /// Order amount below the promo minimum
    PromoMinimumNotMet = 1003,
    /// Normalized promo code already exists
    PromoCodeExists = 1004,
    /// Promo code record not found by id
    PromoCodeNotFound = 1005,

    // ==================== 2xxx: Listing ====================
    /// Listing not found
    ListingNotFound = 2001,
    /// Listing has no price and cannot be booked
    ListingNotPriced = 2002,

    // ==================== 3xxx: Checkout ====================
    /// Pending booking session is older than the allowed window
    SessionExpired = 3001,
    /// Terms and safety policy not accepted
    TermsNotAccepted = 3002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidAmount => "Amount must be greater than 0",
            ErrorCode::InvalidEnum => "Value is not an accepted option",

            // Promo
            ErrorCode::PromoCodeInvalid => "Invalid promo code",
            ErrorCode::PromoCodeExpired => "Promo code has expired",
            ErrorCode::PromoMinimumNotMet => "Minimum order amount not met",
            ErrorCode::PromoCodeExists => "Promo code already exists",
            ErrorCode::PromoCodeNotFound => "Promo code not found",

            // Listing
            ErrorCode::ListingNotFound => "Listing not found",
            ErrorCode::ListingNotPriced => "Listing has no price",

            // Checkout
            ErrorCode::SessionExpired => "Booking session expired. Please start over.",
            ErrorCode::TermsNotAccepted => "Please agree to the terms and safety policy",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }

    /// Stable snake_case name, sent as the `error` field of failed responses
    pub const fn kind(&self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::RequiredField => "missing_field",
            ErrorCode::ValueOutOfRange => "invalid_range",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::PromoCodeInvalid => "not_found",
            ErrorCode::PromoCodeExpired => "expired",
            ErrorCode::PromoMinimumNotMet => "below_minimum",
            ErrorCode::PromoCodeExists => "conflict",
            ErrorCode::PromoCodeNotFound => "not_found",
            ErrorCode::ListingNotFound => "not_found",
            ErrorCode::ListingNotPriced => "invalid_amount",
            ErrorCode::SessionExpired => "session_expired",
            ErrorCode::TermsNotAccepted => "terms_not_accepted",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::InvalidAmount),
            10 => Ok(ErrorCode::InvalidEnum),

            // Promo
            1001 => Ok(ErrorCode::PromoCodeInvalid),
            1002 => Ok(ErrorCode::PromoCodeExpired),
            1003 => Ok(ErrorCode::PromoMinimumNotMet),
            1004 => Ok(ErrorCode::PromoCodeExists),
            1005 => Ok(ErrorCode::PromoCodeNotFound),

            // Listing
            2001 => Ok(ErrorCode::ListingNotFound),
            2002 => Ok(ErrorCode::ListingNotPriced),

            // Checkout
            3001 => Ok(ErrorCode::SessionExpired),
            3002 => Ok(ErrorCode::TermsNotAccepted),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
