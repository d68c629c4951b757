//! Storage ports
//!
//! The promo engine, promo administration and listing administration only see
//! these traits. `postgres` is the durable adapter, `memory` backs development
//! runs without a database and the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Listing, NewListing, NewPromoCode, PromoCode};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return StoreError::Duplicate(err.to_string());
        }
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".into()),
            e => StoreError::Database(e.to_string()),
        }
    }
}

/// Check whether a sqlx error is a unique constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Promo code persistence
///
/// Codes passed in are already normalized; the store compares them verbatim.
#[async_trait]
pub trait PromoStore: Send + Sync {
    /// Look up by normalized code, optionally restricted to `is_active = true`
    async fn find_by_normalized_code(
        &self,
        code: &str,
        active_only: bool,
    ) -> StoreResult<Option<PromoCode>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PromoCode>>;

    /// Insert a new record; an existing code yields `Duplicate`
    async fn insert(&self, promo: NewPromoCode) -> StoreResult<PromoCode>;

    /// Replace every mutable field of `id`; `NotFound` or `Duplicate` on failure
    async fn update(&self, id: i64, promo: NewPromoCode) -> StoreResult<PromoCode>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Newest first. `active_only` keeps `is_active && valid_until >= now`.
    async fn list(&self, active_only: bool, now: DateTime<Utc>) -> StoreResult<Vec<PromoCode>>;

    /// Backend liveness probe
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Listing persistence
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Listing>>;

    async fn insert(&self, listing: NewListing) -> StoreResult<Listing>;

    /// Replace every mutable field of `id`; `NotFound` when missing
    async fn update(&self, id: i64, listing: NewListing) -> StoreResult<Listing>;

    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Newest first
    async fn list(&self) -> StoreResult<Vec<Listing>>;
}
