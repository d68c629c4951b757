//! Experience (listing) API

use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::StatusCode;
use shared::error::ApiResponse;
use shared::models::{Listing, ListingCreate, ListingUpdate};

use super::ApiResult;
use super::extract::{AppJson, AppPath};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/experiences/create", post(create))
        .route("/experiences/experiences", get(list))
        .route("/experiences/experiences/{id}", get(get_by_id))
        .route("/experiences/update/{id}", put(update))
        .route("/experiences/delete/{id}", delete(remove))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ListingCreate>,
) -> Result<(StatusCode, Json<ApiResponse<Listing>>), ServiceError> {
    let listing = state.listing_admin.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Listing created successfully",
            listing,
        )),
    ))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Listing>> {
    let listings = state.listing_admin.list().await?;
    let count = listings.len();
    Ok(Json(
        ApiResponse::success_with_message("Listings retrieved successfully", listings)
            .with_count(count),
    ))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Listing> {
    let listing = state.listing_admin.get(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Listing retrieved successfully",
        listing,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ListingUpdate>,
) -> ApiResult<Listing> {
    let listing = state.listing_admin.update(id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Listing updated successfully",
        listing,
    )))
}

pub async fn remove(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.listing_admin.delete(id).await?;
    Ok(Json(ApiResponse::ok("Listing deleted successfully")))
}
