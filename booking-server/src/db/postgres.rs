//! PostgreSQL store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{DiscountType, Listing, NewListing, NewPromoCode, PromoCode};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{ListingStore, PromoStore, StoreError, StoreResult};
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const PROMO_COLUMNS: &str = "id, code, discount_type, discount_value, min_order_amount, \
                             valid_until, is_active, created_at, updated_at";

const LISTING_COLUMNS: &str =
    "id, title, description, image_url, about, price, created_at, updated_at";

/// Postgres-backed store for promo codes and listings
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with the configured pool limits and apply migrations
    pub async fn connect(config: &Config, database_url: &str) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

// ── Promo codes ──

#[derive(sqlx::FromRow)]
struct PromoCodeRow {
    id: i64,
    code: String,
    discount_type: String,
    discount_value: Decimal,
    min_order_amount: Decimal,
    valid_until: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PromoCodeRow {
    fn into_promo_code(self) -> StoreResult<PromoCode> {
        let discount_type: DiscountType = self.discount_type.parse().map_err(|e| {
            tracing::warn!(promo_id = self.id, discount_type = %self.discount_type, "Invalid discount_type in store");
            StoreError::Database(format!("promo {}: {e}", self.id))
        })?;

        Ok(PromoCode {
            id: self.id,
            code: self.code,
            discount_type,
            discount_value: self.discount_value,
            min_order_amount: self.min_order_amount,
            valid_until: self.valid_until,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl PromoStore for PgStore {
    async fn find_by_normalized_code(
        &self,
        code: &str,
        active_only: bool,
    ) -> StoreResult<Option<PromoCode>> {
        let sql = format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE code = $1 AND (is_active OR NOT $2)"
        );
        sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(code)
            .bind(active_only)
            .fetch_optional(&self.pool)
            .await?
            .map(PromoCodeRow::into_promo_code)
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PromoCode>> {
        let sql = format!("SELECT {PROMO_COLUMNS} FROM promo_codes WHERE id = $1");
        sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(PromoCodeRow::into_promo_code)
            .transpose()
    }

    async fn insert(&self, promo: NewPromoCode) -> StoreResult<PromoCode> {
        let sql = format!(
            r#"
            INSERT INTO promo_codes (code, discount_type, discount_value, min_order_amount, valid_until, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PROMO_COLUMNS}
            "#
        );
        sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(&promo.code)
            .bind(promo.discount_type.as_str())
            .bind(promo.discount_value)
            .bind(promo.min_order_amount)
            .bind(promo.valid_until)
            .bind(promo.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_or(e, &promo.code))?
            .into_promo_code()
    }

    async fn update(&self, id: i64, promo: NewPromoCode) -> StoreResult<PromoCode> {
        let sql = format!(
            r#"
            UPDATE promo_codes
            SET code = $2, discount_type = $3, discount_value = $4, min_order_amount = $5,
                valid_until = $6, is_active = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROMO_COLUMNS}
            "#
        );
        sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(id)
            .bind(&promo.code)
            .bind(promo.discount_type.as_str())
            .bind(promo.discount_value)
            .bind(promo.min_order_amount)
            .bind(promo.valid_until)
            .bind(promo.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| duplicate_or(e, &promo.code))?
            .ok_or_else(|| StoreError::NotFound(format!("promo code {id}")))?
            .into_promo_code()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, active_only: bool, now: DateTime<Utc>) -> StoreResult<Vec<PromoCode>> {
        let sql = format!(
            r#"
            SELECT {PROMO_COLUMNS} FROM promo_codes
            WHERE NOT $1 OR (is_active AND valid_until >= $2)
            ORDER BY created_at DESC, id DESC
            "#
        );
        sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(active_only)
            .bind(now)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PromoCodeRow::into_promo_code)
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique violation on `promo_codes.code` to `Duplicate`
fn duplicate_or(err: sqlx::Error, code: &str) -> StoreError {
    if super::is_unique_violation(&err) {
        StoreError::Duplicate(code.to_string())
    } else {
        err.into()
    }
}

// ── Listings ──

#[async_trait]
impl ListingStore for PgStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Listing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");
        let listing = sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn insert(&self, listing: NewListing) -> StoreResult<Listing> {
        let sql = format!(
            r#"
            INSERT INTO listings (title, description, image_url, about, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LISTING_COLUMNS}
            "#
        );
        let listing = sqlx::query_as::<_, Listing>(&sql)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.image_url)
            .bind(&listing.about)
            .bind(listing.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn update(&self, id: i64, listing: NewListing) -> StoreResult<Listing> {
        let sql = format!(
            r#"
            UPDATE listings
            SET title = $2, description = $3, image_url = $4, about = $5, price = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Listing>(&sql)
            .bind(id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.image_url)
            .bind(&listing.about)
            .bind(listing.price)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("listing {id}")))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> StoreResult<Vec<Listing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC, id DESC");
        let listings = sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(listings)
    }
}
