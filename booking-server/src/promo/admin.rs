//! Promo Administration
//!
//! Create / update / delete / list / get with field validation. Codes are
//! normalized with the same routine the engine uses for lookups.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DiscountType, MAX_CODE_LEN, NewPromoCode, PromoCode, PromoCodeCreate, PromoCodeUpdate,
    normalize_code,
};
use shared::util::{MAX_AMOUNT, has_money_scale, now_utc, parse_datetime};

use crate::db::{PromoStore, StoreError};
use crate::error::{ServiceError, ServiceResult};

/// Promo code administration
#[derive(Clone)]
pub struct PromoAdmin {
    store: Arc<dyn PromoStore>,
}

impl PromoAdmin {
    pub fn new(store: Arc<dyn PromoStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: PromoCodeCreate) -> ServiceResult<PromoCode> {
        let promo = validate_create(&payload)?;

        // The unique index is authoritative; this only produces the error early
        if self
            .store
            .find_by_normalized_code(&promo.code, false)
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::PromoCodeExists).into());
        }

        let created = self.store.insert(promo).await.map_err(promo_store_error)?;
        tracing::info!(promo_id = created.id, code = %created.code, "Promo code created");
        Ok(created)
    }

    /// Partial update; the merged record must pass the create rules
    pub async fn update(&self, id: i64, payload: PromoCodeUpdate) -> ServiceResult<PromoCode> {
        let existing = self.get(id).await?;
        let merged = merge_update(&existing, &payload)?;

        if merged.code != existing.code
            && let Some(other) = self
                .store
                .find_by_normalized_code(&merged.code, false)
                .await?
            && other.id != id
        {
            return Err(AppError::new(ErrorCode::PromoCodeExists).into());
        }

        let updated = self
            .store
            .update(id, merged)
            .await
            .map_err(promo_store_error)?;
        tracing::info!(promo_id = id, code = %updated.code, "Promo code updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::new(ErrorCode::PromoCodeNotFound).into());
        }
        tracing::info!(promo_id = id, "Promo code deleted");
        Ok(())
    }

    /// Newest first; `active_only` keeps active codes that have not expired
    pub async fn list(&self, active_only: bool) -> ServiceResult<Vec<PromoCode>> {
        self.list_at(active_only, now_utc()).await
    }

    pub async fn list_at(
        &self,
        active_only: bool,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<PromoCode>> {
        Ok(self.store.list(active_only, now).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<PromoCode> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PromoCodeNotFound).into())
    }
}

fn promo_store_error(err: StoreError) -> ServiceError {
    match err {
        StoreError::Duplicate(code) => {
            tracing::warn!(code = %code, "Promo code unique constraint hit at write time");
            AppError::new(ErrorCode::PromoCodeExists).into()
        }
        StoreError::NotFound(_) => AppError::new(ErrorCode::PromoCodeNotFound).into(),
        other => other.into(),
    }
}

// ── Field validation ──

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a create payload into insertable fields
pub fn validate_create(payload: &PromoCodeCreate) -> Result<NewPromoCode, AppError> {
    let code = payload
        .code
        .as_deref()
        .map(normalize_code)
        .filter(|c| !c.is_empty());
    let discount_type = non_blank(payload.discount_type.as_deref());
    let valid_until = non_blank(payload.valid_until.as_deref());

    let (Some(code), Some(discount_type), Some(discount_value), Some(valid_until)) =
        (code, discount_type, payload.discount_value, valid_until)
    else {
        let missing: Vec<&str> = [
            ("code", payload.code.as_deref().map(str::trim).is_none_or(str::is_empty)),
            ("discount_type", discount_type.is_none()),
            ("discount_value", payload.discount_value.is_none()),
            ("valid_until", valid_until.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect();
        return Err(AppError::required(
            "Code, discount_type, discount_value, and valid_until are required fields",
        )
        .with_detail("fields", missing));
    };

    let discount_type = parse_discount_type(discount_type)?;
    let min_order_amount = payload.min_order_amount.unwrap_or(Decimal::ZERO);
    check_fields(&code, discount_type, discount_value, min_order_amount)?;

    Ok(NewPromoCode {
        code,
        discount_type,
        discount_value,
        min_order_amount,
        valid_until: parse_valid_until(valid_until)?,
        is_active: payload.is_active.unwrap_or(true),
    })
}

/// Merge an update payload over the stored record and re-validate the result
pub fn merge_update(existing: &PromoCode, payload: &PromoCodeUpdate) -> Result<NewPromoCode, AppError> {
    let code = match payload.code.as_deref() {
        Some(raw) => {
            let code = normalize_code(raw);
            if code.is_empty() {
                return Err(AppError::required("Promo code cannot be empty")
                    .with_detail("field", "code"));
            }
            code
        }
        None => existing.code.clone(),
    };

    let discount_type = match payload.discount_type.as_deref() {
        Some(raw) => parse_discount_type(raw.trim())?,
        None => existing.discount_type,
    };
    let discount_value = payload.discount_value.unwrap_or(existing.discount_value);
    let min_order_amount = payload
        .min_order_amount
        .unwrap_or(existing.min_order_amount);
    check_fields(&code, discount_type, discount_value, min_order_amount)?;

    let valid_until = match payload.valid_until.as_deref() {
        Some(raw) => parse_valid_until(raw)?,
        None => existing.valid_until,
    };

    Ok(NewPromoCode {
        code,
        discount_type,
        discount_value,
        min_order_amount,
        valid_until,
        is_active: payload.is_active.unwrap_or(existing.is_active),
    })
}

fn parse_discount_type(raw: &str) -> Result<DiscountType, AppError> {
    raw.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidEnum,
            "Discount type must be either 'percentage' or 'fixed'",
        )
        .with_detail("field", "discount_type")
    })
}

fn parse_valid_until(raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_datetime(raw).ok_or_else(|| {
        AppError::invalid_format("valid_until must be a valid date or timestamp")
            .with_detail("field", "valid_until")
    })
}

fn check_fields(
    code: &str,
    discount_type: DiscountType,
    discount_value: Decimal,
    min_order_amount: Decimal,
) -> Result<(), AppError> {
    if code.chars().count() > MAX_CODE_LEN {
        return Err(AppError::out_of_range(format!(
            "Promo code must be at most {MAX_CODE_LEN} characters"
        ))
        .with_detail("field", "code"));
    }

    if discount_value <= Decimal::ZERO {
        return Err(AppError::invalid_amount("Discount value must be greater than 0")
            .with_detail("field", "discount_value"));
    }

    if discount_type == DiscountType::Percentage
        && (discount_value < Decimal::ONE || discount_value > Decimal::ONE_HUNDRED)
    {
        return Err(
            AppError::out_of_range("Percentage discount must be between 1 and 100")
                .with_detail("field", "discount_value"),
        );
    }

    if discount_value > MAX_AMOUNT {
        return Err(AppError::out_of_range("Discount value is too large")
            .with_detail("field", "discount_value"));
    }

    if min_order_amount < Decimal::ZERO {
        return Err(
            AppError::invalid_amount("Minimum order amount cannot be negative")
                .with_detail("field", "min_order_amount"),
        );
    }

    if min_order_amount > MAX_AMOUNT {
        return Err(AppError::out_of_range("Minimum order amount is too large")
            .with_detail("field", "min_order_amount"));
    }

    for (field, value) in [
        ("discount_value", discount_value),
        ("min_order_amount", min_order_amount),
    ] {
        if !has_money_scale(value) {
            return Err(AppError::invalid_format(format!(
                "{field} must have at most 2 decimal places"
            ))
            .with_detail("field", field));
        }
    }

    Ok(())
}
