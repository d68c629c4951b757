//! Demo data
//!
//! Fifteen listings and eight promo codes, inserted at boot when
//! `SEED_DEMO_DATA=true`. Existing promo codes and listing titles are skipped.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{DiscountType, NewListing, NewPromoCode};

use crate::db::{ListingStore, PromoStore, StoreError};
use crate::error::ServiceResult;

const IMAGE_PARAMS: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

/// (title, description, unsplash photo id, about, price)
const LISTINGS: &[(&str, &str, &str, &str, i64)] = &[
    (
        "Nandi Hills Sunrise",
        "Experience breathtaking sunrise views from Nandi Hills. Perfect for photography enthusiasts and nature lovers.",
        "photo-1548013146-72479768bada",
        "Early morning trek to Nandi Hills with guided tour. Includes breakfast and photography session.",
        899,
    ),
    (
        "Boat Cruise",
        "Explore the beautiful Sundarban mangroves with our guided boat cruise. Witness diverse wildlife.",
        "photo-1507525428034-b723cf961d3e",
        "Full-day boat cruise with experienced guides. Lunch and safety equipment included.",
        999,
    ),
    (
        "Scuba Diving",
        "Explore the underwater world with certified scuba diving instructors.",
        "photo-1544551763-46a013bb70d5",
        "Beginner-friendly scuba diving experience. All equipment and training provided.",
        2499,
    ),
    (
        "Wildlife Safari",
        "Jeep safari through national park to spot tigers and other wildlife.",
        "photo-1516426122078-c23e76319801",
        "Full-day wildlife safari with expert naturalist. Breakfast and lunch included.",
        1599,
    ),
    (
        "Yoga Retreat",
        "Peaceful yoga retreat in the mountains for mind and body wellness.",
        "photo-1544367567-0f2fcb009e0b",
        "3-day yoga retreat with expert instructors. Accommodation and vegetarian meals included.",
        3499,
    ),
    (
        "River Rafting",
        "Exciting white water river rafting adventure for thrill seekers.",
        "photo-1591382386627-349b692688ff",
        "Grade 3-4 river rafting with safety gear and professional guides.",
        1799,
    ),
    (
        "Cultural Walk",
        "Explore ancient temples and historical sites with knowledgeable guides.",
        "photo-1527525443983-6e60c75fff46",
        "Half-day cultural walking tour. Includes entry fees and guide services.",
        799,
    ),
    (
        "Cooking Class",
        "Learn authentic local cuisine from expert chefs in traditional setting.",
        "photo-1556909114-f6e7ad7d3136",
        "3-hour cooking class with hands-on experience. Recipe book and meal included.",
        1299,
    ),
    (
        "Rock Climbing",
        "Professional rock climbing experience with certified instructors.",
        "photo-1519331379826-f10be5486c6f",
        "Full-day rock climbing session. All safety equipment and training provided.",
        1599,
    ),
    (
        "Bird Watching",
        "Guided bird watching tour in biodiversity-rich forest area.",
        "photo-1421217336522-861978fdf33a",
        "Early morning bird watching with expert ornithologist. Binoculars provided.",
        899,
    ),
    (
        "Cycling Tour",
        "Scenic cycling tour through countryside and villages.",
        "photo-1511994298241-608e28f14fde",
        "Half-day cycling tour with quality bicycles. Refreshments and guide included.",
        699,
    ),
    (
        "Photography Workshop",
        "Learn photography techniques from professional photographers.",
        "photo-1516035069371-29a1b244cc32",
        "Full-day photography workshop in scenic location. Camera equipment can be rented.",
        2199,
    ),
    (
        "Camping Adventure",
        "Overnight camping experience with bonfire and stargazing.",
        "photo-1504851149312-7a075b496cc7",
        "2-day camping trip with all equipment provided. Meals and activities included.",
        1899,
    ),
    (
        "Heritage Tour",
        "Explore UNESCO World Heritage sites with expert historians.",
        "photo-1564507592333-c60657eea523",
        "Full-day heritage tour with audio guides. Transportation and entry fees included.",
        1399,
    ),
    (
        "Spa Retreat",
        "Luxurious spa and wellness retreat for complete relaxation.",
        "photo-1544161515-4ab6ce6db874",
        "Full-day spa retreat with multiple treatments. Healthy meals and pool access included.",
        3999,
    ),
];

/// (code, type, value, minimum order, valid until)
const PROMO_CODES: &[(&str, DiscountType, i64, i64, (i32, u32, u32))] = &[
    ("SAVE10", DiscountType::Percentage, 10, 1000, (2026, 12, 31)),
    ("FLAT100", DiscountType::Fixed, 100, 500, (2026, 12, 31)),
    ("WELCOME15", DiscountType::Percentage, 15, 1500, (2026, 11, 30)),
    ("SUMMER20", DiscountType::Percentage, 20, 2000, (2026, 9, 30)),
    ("FLAT200", DiscountType::Fixed, 200, 1000, (2026, 10, 31)),
    ("QUICK50", DiscountType::Fixed, 50, 300, (2026, 12, 31)),
    ("ADVENTURE25", DiscountType::Percentage, 25, 2500, (2026, 8, 31)),
    ("FIRST5", DiscountType::Percentage, 5, 0, (2026, 12, 31)),
];

/// Rows inserted by a seed run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub listings: usize,
    pub promo_codes: usize,
}

pub fn demo_listings() -> Vec<NewListing> {
    LISTINGS
        .iter()
        .map(|(title, description, photo, about, price)| NewListing {
            title: title.to_string(),
            description: Some(description.to_string()),
            image_url: Some(format!("https://images.unsplash.com/{photo}{IMAGE_PARAMS}")),
            about: Some(about.to_string()),
            price: Some(Decimal::from(*price)),
        })
        .collect()
}

/// Promo codes valid until midnight UTC of their end date
pub fn demo_promo_codes() -> Vec<NewPromoCode> {
    PROMO_CODES
        .iter()
        .filter_map(|(code, discount_type, value, min, (y, m, d))| {
            let valid_until = NaiveDate::from_ymd_opt(*y, *m, *d)?
                .and_hms_opt(0, 0, 0)?
                .and_utc();
            Some(NewPromoCode {
                code: code.to_string(),
                discount_type: *discount_type,
                discount_value: Decimal::from(*value),
                min_order_amount: Decimal::from(*min),
                valid_until,
                is_active: true,
            })
        })
        .collect()
}

/// Insert demo data, skipping rows that already exist
pub async fn seed_demo_data(
    listings: &dyn ListingStore,
    promos: &dyn PromoStore,
) -> ServiceResult<SeedReport> {
    let mut report = SeedReport::default();

    let existing: HashSet<String> = listings.list().await?.into_iter().map(|l| l.title).collect();
    for listing in demo_listings() {
        if existing.contains(&listing.title) {
            continue;
        }
        listings.insert(listing).await?;
        report.listings += 1;
    }

    for promo in demo_promo_codes() {
        match promos.insert(promo).await {
            Ok(_) => report.promo_codes += 1,
            Err(StoreError::Duplicate(code)) => {
                tracing::debug!(code = %code, "Demo promo code already present");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        listings = report.listings,
        promo_codes = report.promo_codes,
        "Demo data seeded"
    );
    Ok(report)
}
