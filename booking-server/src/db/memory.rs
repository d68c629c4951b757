//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured in development, and by tests.
//! Uniqueness of promo codes is checked under the write lock, so it holds the
//! same guarantee as the Postgres unique index.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::models::{Listing, NewListing, NewPromoCode, PromoCode};
use shared::util::now_utc;

use super::{ListingStore, PromoStore, StoreError, StoreResult};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store for promo codes and listings
#[derive(Default)]
pub struct MemoryStore {
    promos: RwLock<Table<PromoCode>>,
    listings: RwLock<Table<Listing>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; ids break ties between rows created in the same instant
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl PromoStore for MemoryStore {
    async fn find_by_normalized_code(
        &self,
        code: &str,
        active_only: bool,
    ) -> StoreResult<Option<PromoCode>> {
        let table = self.promos.read();
        Ok(table
            .rows
            .values()
            .find(|p| p.code == code && (p.is_active || !active_only))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PromoCode>> {
        Ok(self.promos.read().rows.get(&id).cloned())
    }

    async fn insert(&self, promo: NewPromoCode) -> StoreResult<PromoCode> {
        let mut table = self.promos.write();
        if table.rows.values().any(|p| p.code == promo.code) {
            return Err(StoreError::Duplicate(promo.code));
        }

        let now = now_utc();
        let id = table.allocate_id();
        let record = PromoCode {
            id,
            code: promo.code,
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
            min_order_amount: promo.min_order_amount,
            valid_until: promo.valid_until,
            is_active: promo.is_active,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, promo: NewPromoCode) -> StoreResult<PromoCode> {
        let mut table = self.promos.write();
        if table
            .rows
            .values()
            .any(|p| p.id != id && p.code == promo.code)
        {
            return Err(StoreError::Duplicate(promo.code));
        }

        let record = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("promo code {id}")))?;
        record.code = promo.code;
        record.discount_type = promo.discount_type;
        record.discount_value = promo.discount_value;
        record.min_order_amount = promo.min_order_amount;
        record.valid_until = promo.valid_until;
        record.is_active = promo.is_active;
        record.updated_at = now_utc();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.promos.write().rows.remove(&id).is_some())
    }

    async fn list(&self, active_only: bool, now: DateTime<Utc>) -> StoreResult<Vec<PromoCode>> {
        let mut promos: Vec<PromoCode> = self
            .promos
            .read()
            .rows
            .values()
            .filter(|p| !active_only || p.is_usable_at(now))
            .cloned()
            .collect();
        newest_first(&mut promos, |p| (p.created_at, p.id));
        Ok(promos)
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Listing>> {
        Ok(self.listings.read().rows.get(&id).cloned())
    }

    async fn insert(&self, listing: NewListing) -> StoreResult<Listing> {
        let mut table = self.listings.write();
        let now = now_utc();
        let id = table.allocate_id();
        let record = Listing {
            id,
            title: listing.title,
            description: listing.description,
            image_url: listing.image_url,
            about: listing.about,
            price: listing.price,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, listing: NewListing) -> StoreResult<Listing> {
        let mut table = self.listings.write();
        let record = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("listing {id}")))?;
        record.title = listing.title;
        record.description = listing.description;
        record.image_url = listing.image_url;
        record.about = listing.about;
        record.price = listing.price;
        record.updated_at = now_utc();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.listings.write().rows.remove(&id).is_some())
    }

    async fn list(&self) -> StoreResult<Vec<Listing>> {
        let mut listings: Vec<Listing> = self.listings.read().rows.values().cloned().collect();
        newest_first(&mut listings, |l| (l.created_at, l.id));
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use shared::models::DiscountType;

    fn new_promo(code: &str, is_active: bool, valid_until: DateTime<Utc>) -> NewPromoCode {
        NewPromoCode {
            code: code.to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(100),
            min_order_amount: Decimal::ZERO,
            valid_until,
            is_active,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let memory = MemoryStore::new();
        let store: &dyn PromoStore = &memory;
        let until = now_utc() + Duration::days(30);
        store.insert(new_promo("FLAT100", true, until)).await.unwrap();

        let err = store.insert(new_promo("FLAT100", true, until)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(code) if code == "FLAT100"));
    }

    #[tokio::test]
    async fn test_update_checks_uniqueness_excluding_self() {
        let memory = MemoryStore::new();
        let store: &dyn PromoStore = &memory;
        let until = now_utc() + Duration::days(30);
        let a = store.insert(new_promo("AAA", true, until)).await.unwrap();
        store.insert(new_promo("BBB", true, until)).await.unwrap();

        // Keeping its own code is fine
        let same = store.update(a.id, new_promo("AAA", false, until)).await.unwrap();
        assert!(!same.is_active);

        let err = store.update(a.id, new_promo("BBB", true, until)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let err = store.update(999, new_promo("CCC", true, until)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_code_respects_active_filter() {
        let memory = MemoryStore::new();
        let store: &dyn PromoStore = &memory;
        let until = now_utc() + Duration::days(30);
        store.insert(new_promo("OFF", false, until)).await.unwrap();

        assert!(store.find_by_normalized_code("OFF", true).await.unwrap().is_none());
        assert!(store.find_by_normalized_code("OFF", false).await.unwrap().is_some());
        assert!(store.find_by_normalized_code("off", false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_only_and_newest_first() {
        let memory = MemoryStore::new();
        let store: &dyn PromoStore = &memory;
        let now = now_utc();
        let live = store.insert(new_promo("LIVE", true, now + Duration::days(1))).await.unwrap();
        store.insert(new_promo("OLD", true, now - Duration::days(1))).await.unwrap();
        let edge = store.insert(new_promo("EDGE", true, now)).await.unwrap();
        store.insert(new_promo("OFF", false, now + Duration::days(1))).await.unwrap();

        let all = store.list(false, now).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].code, "OFF");
        assert_eq!(all[3].code, "LIVE");

        let active = store.list(true, now).await.unwrap();
        let ids: Vec<i64> = active.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![edge.id, live.id]);
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let memory = MemoryStore::new();
        let store: &dyn PromoStore = &memory;
        let until = now_utc() + Duration::days(30);
        let promo = store.insert(new_promo("GONE", true, until)).await.unwrap();

        assert!(store.delete(promo.id).await.unwrap());
        assert!(!store.delete(promo.id).await.unwrap());
        assert!(store.find_by_id(promo.id).await.unwrap().is_none());
    }
}
