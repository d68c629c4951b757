//! Checkout pricing and confirmation
//!
//! The promo discount is computed by the engine against the subtotal, so the
//! returned `promo.original_amount` always equals the quote's `subtotal`.
//! Confirmed bookings are not persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingConfirmation, CheckoutQuote, ConfirmRequest, PendingBooking, QuoteRequest,
};
use shared::util::{MAX_AMOUNT, MAX_QUANTITY, booking_reference, now_utc, round_money};
use validator::ValidateEmail;

use crate::db::ListingStore;
use crate::error::ServiceResult;
use crate::promo::PromoEngine;

/// Sales tax applied to the subtotal (6%)
pub const TAX_RATE: Decimal = Decimal::from_parts(6, 0, 0, false, 2);

#[derive(Clone)]
pub struct Checkout {
    listings: Arc<dyn ListingStore>,
    engine: PromoEngine,
}

impl Checkout {
    pub fn new(listings: Arc<dyn ListingStore>, engine: PromoEngine) -> Self {
        Self { listings, engine }
    }

    /// Price `quantity` seats of a listing at its current price
    pub async fn quote(&self, request: QuoteRequest) -> ServiceResult<CheckoutQuote> {
        self.quote_at(request, now_utc()).await
    }

    pub async fn quote_at(
        &self,
        request: QuoteRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<CheckoutQuote> {
        let experience_id = request.experience_id.ok_or_else(|| {
            AppError::required("experience_id is required").with_detail("field", "experience_id")
        })?;
        let quantity = check_quantity(request.quantity.unwrap_or(0))?;

        let listing = self
            .listings
            .find_by_id(experience_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ListingNotFound))?;
        let unit_price = listing.price.ok_or_else(|| {
            AppError::new(ErrorCode::ListingNotPriced).with_detail("experience_id", experience_id)
        })?;

        self.price(
            experience_id,
            unit_price,
            quantity,
            request.promo_code.as_deref(),
            now,
        )
        .await
    }

    /// Confirm a pending booking
    pub async fn confirm(&self, request: ConfirmRequest) -> ServiceResult<BookingConfirmation> {
        self.confirm_at(request, now_utc()).await
    }

    pub async fn confirm_at(
        &self,
        request: ConfirmRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<BookingConfirmation> {
        let ConfirmRequest {
            booking,
            full_name,
            email,
            agreed_to_terms,
            promo_code,
        } = request;

        if booking.is_expired_at(now) {
            tracing::debug!(experience_id = booking.experience_id, "Booking session expired");
            return Err(AppError::new(ErrorCode::SessionExpired).into());
        }

        let full_name = full_name.trim().to_string();
        let email = email.trim().to_string();
        check_contact(&full_name, &email)?;

        if !agreed_to_terms {
            return Err(AppError::new(ErrorCode::TermsNotAccepted).into());
        }

        check_booking(&booking)?;
        if self.listings.find_by_id(booking.experience_id).await?.is_none() {
            return Err(AppError::new(ErrorCode::ListingNotFound).into());
        }

        let quote = self
            .price(
                booking.experience_id,
                booking.price,
                booking.quantity,
                promo_code.as_deref(),
                now,
            )
            .await?;

        let confirmation = BookingConfirmation {
            booking_reference: booking_reference(),
            experience_id: booking.experience_id,
            date: booking.date,
            time: booking.time,
            full_name,
            email,
            quote,
        };
        tracing::info!(
            booking_reference = %confirmation.booking_reference,
            experience_id = confirmation.experience_id,
            total = %confirmation.quote.total,
            "Booking confirmed"
        );
        Ok(confirmation)
    }

    /// subtotal = price × quantity, taxes = 6% of subtotal,
    /// total = max(subtotal + taxes − discount, 0)
    async fn price(
        &self,
        experience_id: i64,
        unit_price: Decimal,
        quantity: u32,
        promo_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> ServiceResult<CheckoutQuote> {
        let subtotal = round_money(unit_price * Decimal::from(quantity));
        let taxes = round_money(subtotal * TAX_RATE);

        let promo = match promo_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(self.engine.validate_at(code, Some(subtotal), now).await?),
            None => None,
        };
        let discount = promo
            .as_ref()
            .map(|p| p.discount_amount)
            .unwrap_or(Decimal::ZERO);
        let total = round_money((subtotal + taxes - discount).max(Decimal::ZERO));

        Ok(CheckoutQuote {
            experience_id,
            quantity,
            unit_price,
            subtotal,
            taxes,
            discount,
            total,
            promo,
        })
    }
}

fn check_quantity(quantity: u32) -> Result<u32, AppError> {
    if quantity == 0 {
        return Err(AppError::invalid_amount("Quantity must be at least 1")
            .with_detail("field", "quantity"));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::invalid_amount(format!(
            "Quantity cannot exceed {MAX_QUANTITY}"
        ))
        .with_detail("field", "quantity"));
    }
    Ok(quantity)
}

/// Price and quantity arrive from the client; bound both before pricing
fn check_booking(booking: &PendingBooking) -> Result<(), AppError> {
    check_quantity(booking.quantity)?;
    if booking.price <= Decimal::ZERO {
        return Err(AppError::invalid_amount("Booking price must be greater than 0")
            .with_detail("field", "price"));
    }
    if booking.price > MAX_AMOUNT {
        return Err(AppError::invalid_amount(format!(
            "Booking price cannot exceed {MAX_AMOUNT}"
        ))
        .with_detail("field", "price"));
    }
    Ok(())
}

fn check_contact(full_name: &str, email: &str) -> Result<(), AppError> {
    let missing: Vec<&str> = [("full_name", full_name), ("email", email)]
        .into_iter()
        .filter_map(|(field, value)| value.is_empty().then_some(field))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::required("Please fill in all required fields")
            .with_detail("fields", missing));
    }
    if !email.validate_email() {
        return Err(AppError::invalid_format("Please enter a valid email address")
            .with_detail("field", "email"));
    }
    Ok(())
}
