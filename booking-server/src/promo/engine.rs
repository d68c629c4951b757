//! Promo Validation Engine
//!
//! Read-only: decides whether a code applies to an order amount and computes
//! the discount. Flow: normalize → lookup (active only) → expiry → minimum →
//! discount → final amount.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DiscountResult, DiscountType, PromoCode, PromoPreview, PromoStatus, normalize_code,
};
use shared::util::{MAX_AMOUNT, now_utc, round_money};

use crate::db::PromoStore;
use crate::error::ServiceResult;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Why a found promo code does not apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Expired,
    BelowMinimum(Decimal),
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Expired => AppError::new(ErrorCode::PromoCodeExpired),
            Rejection::BelowMinimum(min) => AppError::with_message(
                ErrorCode::PromoMinimumNotMet,
                format!("Minimum order amount of {min:.2} required for this promo"),
            )
            .with_detail("min_order_amount", min.to_f64().unwrap_or_default()),
        }
    }
}

/// Promo code validation and discount calculation
#[derive(Clone)]
pub struct PromoEngine {
    store: Arc<dyn PromoStore>,
}

impl PromoEngine {
    pub fn new(store: Arc<dyn PromoStore>) -> Self {
        Self { store }
    }

    /// Validate `code` against `order_amount` at the current instant
    pub async fn validate(
        &self,
        code: &str,
        order_amount: Option<Decimal>,
    ) -> ServiceResult<DiscountResult> {
        self.validate_at(code, order_amount, now_utc()).await
    }

    /// Validate with an explicit clock
    ///
    /// Inactive codes are reported exactly like missing ones.
    pub async fn validate_at(
        &self,
        code: &str,
        order_amount: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> ServiceResult<DiscountResult> {
        let (code, order_amount) = check_request(code, order_amount)?;

        let promo = self
            .store
            .find_by_normalized_code(&code, true)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PromoCodeInvalid))?;

        check_applicable(&promo, order_amount, now).map_err(AppError::from)?;

        let result = calculate_discount(&promo, order_amount);
        tracing::debug!(
            promo_id = promo.id,
            code = %promo.code,
            order_amount = %order_amount,
            discount = %result.discount_amount,
            "Promo code applied"
        );
        Ok(result)
    }

    /// Explain how `code` relates to `order_amount`, including inactive codes
    pub async fn preview(
        &self,
        code: &str,
        order_amount: Option<Decimal>,
    ) -> ServiceResult<PromoPreview> {
        self.preview_at(code, order_amount, now_utc()).await
    }

    pub async fn preview_at(
        &self,
        code: &str,
        order_amount: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> ServiceResult<PromoPreview> {
        let (code, order_amount) = check_request(code, order_amount)?;

        let Some(promo) = self.store.find_by_normalized_code(&code, false).await? else {
            return Ok(rejected(PromoStatus::NotFound, "Invalid promo code"));
        };
        if !promo.is_active {
            return Ok(rejected(PromoStatus::Inactive, "This promo code is inactive"));
        }

        let preview = match check_applicable(&promo, order_amount, now) {
            Ok(()) => PromoPreview {
                status: PromoStatus::Applicable,
                message: "Promo code applied successfully".to_string(),
                discount: Some(calculate_discount(&promo, order_amount)),
            },
            Err(rejection) => {
                let status = match rejection {
                    Rejection::Expired => PromoStatus::Expired,
                    Rejection::BelowMinimum(_) => PromoStatus::BelowMinimum,
                };
                rejected(status, AppError::from(rejection).message)
            }
        };
        Ok(preview)
    }
}

fn rejected(status: PromoStatus, message: impl Into<String>) -> PromoPreview {
    PromoPreview {
        status,
        message: message.into(),
        discount: None,
    }
}

/// Input checks shared by validate and preview; returns the normalized code
fn check_request(code: &str, order_amount: Option<Decimal>) -> Result<(String, Decimal), AppError> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(AppError::required("Promo code is required").with_detail("field", "code"));
    }

    match order_amount {
        Some(amount) if amount > MAX_AMOUNT => Err(AppError::invalid_amount(format!(
            "Order amount cannot exceed {MAX_AMOUNT}"
        ))
        .with_detail("field", "order_amount")),
        Some(amount) if amount > Decimal::ZERO => Ok((code, amount)),
        _ => Err(AppError::invalid_amount("Valid order amount is required")
            .with_detail("field", "order_amount")),
    }
}

/// Expiry is inclusive; the minimum only applies when it is positive.
fn check_applicable(
    promo: &PromoCode,
    order_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    if promo.is_expired_at(now) {
        return Err(Rejection::Expired);
    }
    let min = promo.min_order_amount;
    if min > Decimal::ZERO && order_amount < min {
        return Err(Rejection::BelowMinimum(min));
    }
    Ok(())
}

/// Compute the discount of an applicable promo code
///
/// - percentage: `order_amount * value / 100`
/// - fixed: `min(value, order_amount)`
///
/// The final amount never goes below zero. Both computed amounts are rounded
/// to 2 decimal places; the other fields pass through unchanged.
pub fn calculate_discount(promo: &PromoCode, order_amount: Decimal) -> DiscountResult {
    let discount = match promo.discount_type {
        DiscountType::Percentage => order_amount * promo.discount_value / HUNDRED,
        DiscountType::Fixed => promo.discount_value.min(order_amount),
    };
    let final_amount = (order_amount - discount).max(Decimal::ZERO);

    DiscountResult {
        promo_code: promo.code.clone(),
        discount_type: promo.discount_type,
        discount_value: promo.discount_value,
        discount_amount: round_money(discount),
        original_amount: order_amount,
        final_amount: round_money(final_amount),
        min_order_amount: promo.min_order_amount,
    }
}
