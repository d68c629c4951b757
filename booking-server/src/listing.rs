//! Listing administration

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Listing, ListingCreate, ListingUpdate, NewListing};
use shared::util::{MAX_AMOUNT, has_money_scale};
use validator::Validate;

use crate::db::{ListingStore, StoreError};
use crate::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ListingAdmin {
    store: Arc<dyn ListingStore>,
}

impl ListingAdmin {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: ListingCreate) -> ServiceResult<Listing> {
        payload.validate().map_err(AppError::from)?;

        let title = payload
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::required("Title is required").with_detail("field", "title"))?;
        check_price(payload.price)?;

        let listing = self
            .store
            .insert(NewListing {
                title: title.to_string(),
                description: payload.description,
                image_url: payload.image_url,
                about: payload.about,
                price: payload.price,
            })
            .await?;
        tracing::info!(listing_id = listing.id, title = %listing.title, "Listing created");
        Ok(listing)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Listing>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Listing> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ListingNotFound).into())
    }

    /// Title is only replaced when non-empty; other fields when present
    pub async fn update(&self, id: i64, payload: ListingUpdate) -> ServiceResult<Listing> {
        payload.validate().map_err(AppError::from)?;
        check_price(payload.price)?;

        let existing = self.get(id).await?;
        let title = payload
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or(existing.title);

        let listing = self
            .store
            .update(
                id,
                NewListing {
                    title,
                    description: payload.description.or(existing.description),
                    image_url: payload.image_url.or(existing.image_url),
                    about: payload.about.or(existing.about),
                    price: payload.price.or(existing.price),
                },
            )
            .await
            .map_err(listing_store_error)?;
        tracing::info!(listing_id = id, "Listing updated");
        Ok(listing)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::new(ErrorCode::ListingNotFound).into());
        }
        tracing::info!(listing_id = id, "Listing deleted");
        Ok(())
    }
}

fn check_price(price: Option<Decimal>) -> Result<(), AppError> {
    match price {
        Some(p) if p < Decimal::ZERO => Err(AppError::invalid_amount("Price cannot be negative")
            .with_detail("field", "price")),
        Some(p) if p > MAX_AMOUNT => Err(AppError::out_of_range("Price is too large")
            .with_detail("field", "price")),
        Some(p) if !has_money_scale(p) => Err(AppError::invalid_format(
            "Price must have at most 2 decimal places",
        )
        .with_detail("field", "price")),
        _ => Ok(()),
    }
}

fn listing_store_error(err: StoreError) -> ServiceError {
    match err {
        StoreError::NotFound(_) => AppError::new(ErrorCode::ListingNotFound).into(),
        other => other.into(),
    }
}
