//! Promo code API
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | /promo/create | create |
//! | GET | /promo/get-all | list (`?active_only=true`) |
//! | POST | /promo/validate | validate |
//! | POST | /promo/preview | preview |
//! | GET | /promo/get/{id} | get |
//! | PUT | /promo/update/{id} | update |
//! | DELETE | /promo/delete/{id} | delete |

use axum::extract::{Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::StatusCode;
use shared::error::ApiResponse;
use shared::models::{
    DiscountResult, PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoListQuery, PromoPreview,
    ValidatePromoRequest,
};

use super::ApiResult;
use super::extract::{AppJson, AppPath};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/promo/create", post(create))
        .route("/promo/get-all", get(list))
        .route("/promo/validate", post(validate))
        .route("/promo/preview", post(preview))
        .route("/promo/get/{id}", get(get_by_id))
        .route("/promo/update/{id}", put(update))
        .route("/promo/delete/{id}", delete(remove))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PromoCodeCreate>,
) -> Result<(StatusCode, Json<ApiResponse<PromoCode>>), ServiceError> {
    let promo = state.promo_admin.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Promo code created successfully",
            promo,
        )),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PromoListQuery>,
) -> ApiResult<Vec<PromoCode>> {
    let promos = state.promo_admin.list(query.active_only()).await?;
    let count = promos.len();
    Ok(Json(
        ApiResponse::success_with_message("Promo codes retrieved successfully", promos)
            .with_count(count),
    ))
}

pub async fn validate(
    State(state): State<AppState>,
    AppJson(req): AppJson<ValidatePromoRequest>,
) -> ApiResult<DiscountResult> {
    let code = req.code.unwrap_or_default();
    let result = state.engine.validate(&code, req.order_amount).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Promo code applied successfully",
        result,
    )))
}

pub async fn preview(
    State(state): State<AppState>,
    AppJson(req): AppJson<ValidatePromoRequest>,
) -> ApiResult<PromoPreview> {
    let code = req.code.unwrap_or_default();
    let preview = state.engine.preview(&code, req.order_amount).await?;
    Ok(Json(ApiResponse::success_with_message(
        preview.message.clone(),
        preview,
    )))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<PromoCode> {
    let promo = state.promo_admin.get(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Promo code retrieved successfully",
        promo,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<PromoCodeUpdate>,
) -> ApiResult<PromoCode> {
    let promo = state.promo_admin.update(id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Promo code updated successfully",
        promo,
    )))
}

pub async fn remove(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.promo_admin.delete(id).await?;
    Ok(Json(ApiResponse::ok("Promo code deleted successfully")))
}
