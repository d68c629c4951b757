//! Promo codes: validation engine and administration

pub mod admin;
pub mod engine;

pub use admin::PromoAdmin;
pub use engine::{PromoEngine, calculate_discount};
