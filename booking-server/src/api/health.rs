//! Health check
//!
//! ```json
//! {
//!   "status": "ok",
//!   "service": "booking-server",
//!   "version": "0.1.0",
//!   "store": { "backend": "postgres", "status": "ok", "latency_ms": 2 }
//! }
//! ```

use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    service: &'static str,
    version: &'static str,
    store: StoreCheck,
}

/// Store ping result
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    backend: &'static str,
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let store = match state.promo_store.ping().await {
        Ok(()) => StoreCheck {
            backend: state.store_backend,
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, backend = state.store_backend, "Store ping failed");
            StoreCheck {
                backend: state.store_backend,
                status: "error",
                latency_ms: None,
                message: Some(e.to_string()),
            }
        }
    };

    let (code, status) = if store.status == "ok" {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: "booking-server",
            version: env!("CARGO_PKG_VERSION"),
            store,
        }),
    )
}
