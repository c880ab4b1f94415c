use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use jornada_portal::error::PortalError;
use jornada_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!("upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "storage unavailable".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<PortalError> for ApiError {
    fn from(e: PortalError) -> Self {
        match e {
            PortalError::NoSession => ApiError::Unauthorized(e.to_string()),
            PortalError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            PortalError::FetchFailed { .. } => ApiError::BadGateway(e.to_string()),
            PortalError::MutationConflict { .. } => ApiError::Conflict(e.to_string()),
            PortalError::Storage(storage) => storage.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { key } => ApiError::NotFound(format!("object not found: {key}")),
            StorageError::AlreadyExists { .. } | StorageError::PreconditionFailed { .. } => {
                ApiError::Conflict(e.to_string())
            }
            StorageError::Invalid(_) => ApiError::BadRequest(e.to_string()),
            StorageError::GetObject(_) | StorageError::PutObject(_) | StorageError::ListObjects(_) => {
                ApiError::BadGateway(e.to_string())
            }
            StorageError::Serialization(_) => ApiError::Internal(e.to_string()),
        }
    }
}
