//! Application state for booking-server

use std::sync::Arc;

use crate::checkout::Checkout;
use crate::config::Config;
use crate::db::{ListingStore, MemoryStore, PgStore, PromoStore};
use crate::listing::ListingAdmin;
use crate::promo::{PromoAdmin, PromoEngine};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store backend name reported by the health endpoint
    pub store_backend: &'static str,
    pub promo_store: Arc<dyn PromoStore>,
    pub listing_store: Arc<dyn ListingStore>,
    pub engine: PromoEngine,
    pub promo_admin: PromoAdmin,
    pub listing_admin: ListingAdmin,
    pub checkout: Checkout,
}

impl AppState {
    /// Create a new AppState, connecting to Postgres when `DATABASE_URL` is set
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        match config.database_url.as_deref() {
            Some(url) => {
                let store = Arc::new(PgStore::connect(config, url).await?);
                tracing::info!(
                    max_connections = config.db_max_connections,
                    "Connected to PostgreSQL"
                );
                Ok(Self::with_stores("postgres", store.clone(), store))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
                Ok(Self::in_memory())
            }
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores("memory", store.clone(), store)
    }

    pub fn with_stores(
        store_backend: &'static str,
        promo_store: Arc<dyn PromoStore>,
        listing_store: Arc<dyn ListingStore>,
    ) -> Self {
        let engine = PromoEngine::new(promo_store.clone());
        Self {
            store_backend,
            promo_admin: PromoAdmin::new(promo_store.clone()),
            listing_admin: ListingAdmin::new(listing_store.clone()),
            checkout: Checkout::new(listing_store.clone(), engine.clone()),
            engine,
            promo_store,
            listing_store,
        }
    }
}
