//! Listing (Experience) Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MAX_TITLE_LEN: u64 = 128;
pub const MAX_IMAGE_URL_LEN: u64 = 512;

/// Bookable experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub about: Option<String>,
    /// Price per person; unpriced listings cannot be checked out
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated listing fields, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub about: Option<String>,
    pub price: Option<Decimal>,
}

/// Image URLs must use http or https
fn http_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_url").with_message("Image URL must use http or https".into()))
    }
}

/// Create listing payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListingCreate {
    #[validate(length(max = 128, message = "Title must be at most 128 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(
        length(max = 512, message = "Image URL must be at most 512 characters"),
        url(message = "Image URL must be a valid URL"),
        custom(function = "http_url")
    )]
    pub image_url: Option<String>,
    pub about: Option<String>,
    pub price: Option<Decimal>,
}

/// Update listing payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListingUpdate {
    #[validate(length(max = 128, message = "Title must be at most 128 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(
        length(max = 512, message = "Image URL must be at most 512 characters"),
        url(message = "Image URL must be a valid URL"),
        custom(function = "http_url")
    )]
    pub image_url: Option<String>,
    pub about: Option<String>,
    pub price: Option<Decimal>,
}
