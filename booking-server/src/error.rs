//! Unified service-layer error type for booking-server
//!
//! `ServiceError` bridges the gap between store-layer errors (`StoreError`,
//! `sqlx::Error`) and the API-layer error (`AppError`), so handlers can use `?`
//! without mapping every failure by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ServiceError::App(AppError::not_found(what)),
            StoreError::Duplicate(what) => ServiceError::App(AppError::with_message(
                ErrorCode::AlreadyExists,
                format!("{what} already exists"),
            )),
            StoreError::Database(msg) => ServiceError::Db(msg.into()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_codes() {
        let err: AppError = ServiceError::from(StoreError::NotFound("Listing".into())).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = ServiceError::from(StoreError::Duplicate("SAVE10".into())).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err: AppError =
            ServiceError::from(StoreError::Database("connection refused".into())).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }
}
