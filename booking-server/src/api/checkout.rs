//! Checkout API

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use shared::error::ApiResponse;
use shared::models::{BookingConfirmation, CheckoutQuote, ConfirmRequest, QuoteRequest};

use super::ApiResult;
use super::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout/quote", post(quote))
        .route("/checkout/confirm", post(confirm))
}

pub async fn quote(
    State(state): State<AppState>,
    AppJson(req): AppJson<QuoteRequest>,
) -> ApiResult<CheckoutQuote> {
    let quote = state.checkout.quote(req).await?;
    Ok(Json(ApiResponse::success_with_message("Quote calculated", quote)))
}

pub async fn confirm(
    State(state): State<AppState>,
    AppJson(req): AppJson<ConfirmRequest>,
) -> ApiResult<BookingConfirmation> {
    let confirmation = state.checkout.confirm(req).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Booking confirmed",
        confirmation,
    )))
}
