//! Data models
//!
//! Shared between booking-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (Postgres BIGSERIAL).

pub mod checkout;
pub mod listing;
pub mod promo_code;

// Re-exports
pub use checkout::*;
pub use listing::*;
pub use promo_code::*;
