//! Checkout Models
//!
//! A pending booking lives on the client between the experience page and the
//! checkout page. The server only prices and confirms it.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::promo_code::DiscountResult;

/// Pending booking lifetime
pub const BOOKING_SESSION_MINUTES: i64 = 30;

/// Booking held by the client until checkout completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingBooking {
    pub experience_id: i64,
    pub date: Option<String>,
    pub time: Option<String>,
    pub quantity: u32,
    /// Unit price captured when the booking was started
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Unix millis when the booking was started
    pub timestamp: i64,
}

impl PendingBooking {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Expired once more than 30 minutes have passed, or when the timestamp is
    /// unreadable.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.started_at() {
            Some(started) => now - started > Duration::minutes(BOOKING_SESSION_MINUTES),
            None => true,
        }
    }
}

/// Quote request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub experience_id: Option<i64>,
    pub quantity: Option<u32>,
    pub promo_code: Option<String>,
}

/// Priced checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub experience_id: i64,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxes: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Applied promo, `original_amount` equals `subtotal`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<DiscountResult>,
}

/// Confirm request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub booking: PendingBooking,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub agreed_to_terms: bool,
    pub promo_code: Option<String>,
}

/// Confirmed (not persisted) booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_reference: String,
    pub experience_id: i64,
    pub date: Option<String>,
    pub time: Option<String>,
    pub full_name: String,
    pub email: String,
    pub quote: CheckoutQuote,
}
