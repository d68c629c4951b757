//! booking-server: experiences marketplace backend
//!
//! - Promo code validation and administration
//! - Experience listings
//! - Checkout pricing and booking confirmation

pub mod api;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod logger;
pub mod promo;
pub mod seed;
pub mod state;

pub use config::Config;
pub use state::AppState;
