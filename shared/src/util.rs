use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::*;

/// Monetary values are reported with 2 decimal places, half away from zero
pub const DECIMAL_PLACES: u32 = 2;

/// Largest amount a `NUMERIC(10,2)` column holds (99,999,999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Maximum seats in a single booking
pub const MAX_QUANTITY: u32 = 9999;

/// Whether `value` fits a 2-decimal money column without rounding
pub fn has_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= DECIMAL_PLACES
}

/// Current UTC instant
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Round a monetary value to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a client-supplied validity timestamp.
///
/// Accepts RFC 3339 (`2026-12-31T23:59:59Z`, with any offset), a naive
/// datetime (`2026-12-31T23:59:59`, read as UTC) or a bare date
/// (`2026-12-31`, read as midnight UTC).
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Generate a booking reference: 8 characters from `[A-Z0-9]`.
pub fn booking_reference() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
