use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use skyport_core::{CoreError, StoreError};

#[derive(Debug)]
pub enum AppError {
    /// Request body or parameters failed shape validation.
    Validation(String),
    /// Well-formed input rejected by a domain rule.
    BusinessRule(String),
    NotFound(String),
    Conflict(String),
    InvalidState(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Validation(msg) => {
                tracing::error!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, "Validation Error", msg)
            }
            AppError::BusinessRule(msg) => {
                tracing::error!("Business rule violation: {}", msg);
                (StatusCode::BAD_REQUEST, "Business Rule Violation", msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg),
            AppError::InvalidState(msg) => {
                tracing::error!("Inconsistent flight state: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid State", msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": error,
            "message": message,
            "timestamp": Utc::now(),
        }));

        (status, body).into_response()
    }
}

/// JSON body extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid input data: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid input data: {}", rejection.body_text()))
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::FlightNotFound(_) => AppError::NotFound(err.to_string()),
            CoreError::InvalidArgument(msg) => AppError::BusinessRule(msg),
            CoreError::InvalidState(msg) => AppError::InvalidState(msg),
            CoreError::Store(
                ref store_err @ (StoreError::DuplicateFlightNumber(_)
                | StoreError::VersionConflict { .. }),
            ) => AppError::Conflict(store_err.to_string()),
            CoreError::Store(store_err) => AppError::Internal(store_err.to_string()),
        }
    }
}
