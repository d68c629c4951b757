//! Shared types for the booking marketplace
//!
//! Models, request payloads, the unified error system and the response
//! envelope, plus money and time helpers used by the server.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
