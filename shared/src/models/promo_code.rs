//! Promo Code Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Maximum stored length of a promo code
pub const MAX_CODE_LEN: usize = 50;

/// Normalize a promo code for storage, lookup and uniqueness checks.
///
/// Every read and write path goes through this function; a code stored in any
/// other form would never be found by validation.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Discount mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` percent of the order amount
    Percentage,
    /// Flat `discount_value`, never more than the order amount
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a discount type outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown discount type: {0}")]
pub struct UnknownDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    /// Exact match only; `"Percentage"` or `"flat"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(UnknownDiscountType(other.to_string())),
        }
    }
}

/// Promo code entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: i64,
    /// Always stored normalized (trimmed, upper-case)
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromoCode {
    /// Expiry is inclusive: a code is still valid at exactly `valid_until`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Active and not yet expired
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

/// Fields of a validated promo code, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromoCode {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Decimal,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

/// Create promo code payload
///
/// Every field is optional at the wire level so a missing field is reported
/// as `missing_field` instead of a generic body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodeCreate {
    pub code: Option<String>,
    pub discount_type: Option<String>,
    pub discount_value: Option<Decimal>,
    pub min_order_amount: Option<Decimal>,
    pub valid_until: Option<String>,
    pub is_active: Option<bool>,
}

/// Update promo code payload
///
/// Absent fields keep their current value; `0` and `false` are real values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodeUpdate {
    pub code: Option<String>,
    pub discount_type: Option<String>,
    pub discount_value: Option<Decimal>,
    pub min_order_amount: Option<Decimal>,
    pub valid_until: Option<String>,
    pub is_active: Option<bool>,
}

/// Query string of the list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoListQuery {
    /// Only the literal `true` enables the filter
    pub active_only: Option<String>,
}

impl PromoListQuery {
    pub fn active_only(&self) -> bool {
        self.active_only.as_deref() == Some("true")
    }
}

/// Validate / preview request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatePromoRequest {
    pub code: Option<String>,
    /// Unparseable amounts read as absent and are rejected as invalid amounts
    #[serde(default, deserialize_with = "lenient_amount")]
    pub order_amount: Option<Decimal>,
}

/// Accept a JSON number or a numeric string; anything else is `None`
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(amount)
}

/// Outcome of applying a promo code to an order amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountResult {
    pub promo_code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
}

/// Why a code does or does not apply, as reported by the preview endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromoStatus {
    Applicable,
    NotFound,
    Inactive,
    Expired,
    BelowMinimum,
}

/// Preview result with a user-facing message for every status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoPreview {
    pub status: PromoStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(valid_until: DateTime<Utc>, is_active: bool) -> PromoCode {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        PromoCode {
            id: 1,
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_order_amount: Decimal::from(1000),
            valid_until,
            is_active,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("save10"), "SAVE10");
        assert_eq!(normalize_code("  Flat100 \n"), "FLAT100");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn test_discount_type_parse_is_exact() {
        assert_eq!("percentage".parse::<DiscountType>(), Ok(DiscountType::Percentage));
        assert_eq!("fixed".parse::<DiscountType>(), Ok(DiscountType::Fixed));
        assert!("Percentage".parse::<DiscountType>().is_err());
        assert!("flat".parse::<DiscountType>().is_err());
        assert!("".parse::<DiscountType>().is_err());
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let until = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        let promo = sample(until, true);
        assert!(!promo.is_expired_at(until));
        assert!(promo.is_expired_at(until + chrono::Duration::nanoseconds(1)));
    }

    #[test]
    fn test_usable_requires_active_and_unexpired() {
        let until = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        let before = until - chrono::Duration::days(1);
        assert!(sample(until, true).is_usable_at(before));
        assert!(!sample(until, false).is_usable_at(before));
        assert!(!sample(before, true).is_usable_at(until));
    }

    #[test]
    fn test_promo_serializes_amounts_as_numbers() {
        let until = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        let json = serde_json::to_value(sample(until, true)).unwrap();
        assert_eq!(json["discount_type"], "percentage");
        assert_eq!(json["discount_value"], 10.0);
        assert_eq!(json["min_order_amount"], 1000.0);
    }

    #[test]
    fn test_create_payload_accepts_numbers_and_strings() {
        let payload: PromoCodeCreate = serde_json::from_str(
            r#"{"code":"save10","discount_type":"percentage","discount_value":10,"min_order_amount":"1000.50","valid_until":"2026-12-31"}"#,
        )
        .unwrap();
        assert_eq!(payload.discount_value, Some(Decimal::from(10)));
        assert_eq!(payload.min_order_amount, Some(Decimal::new(100050, 2)));
        assert!(payload.is_active.is_none());
    }

    #[test]
    fn test_validate_request_amount_is_lenient() {
        let parse = |body: &str| serde_json::from_str::<ValidatePromoRequest>(body).unwrap();
        assert_eq!(parse(r#"{"code":"x","order_amount":2000}"#).order_amount, Some(Decimal::from(2000)));
        assert_eq!(parse(r#"{"code":"x","order_amount":"999.99"}"#).order_amount, Some(Decimal::new(99999, 2)));
        assert_eq!(parse(r#"{"code":"x","order_amount":"abc"}"#).order_amount, None);
        assert_eq!(parse(r#"{"code":"x","order_amount":null}"#).order_amount, None);
        assert_eq!(parse(r#"{"code":"x"}"#).order_amount, None);
    }

    #[test]
    fn test_list_query_only_literal_true() {
        let q = |v: Option<&str>| PromoListQuery {
            active_only: v.map(String::from),
        };
        assert!(q(Some("true")).active_only());
        assert!(!q(Some("1")).active_only());
        assert!(!q(Some("false")).active_only());
        assert!(!q(None).active_only());
    }
}
