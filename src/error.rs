//! Error types for the document service
//!
//! Provides unified error handling using thiserror: storage-layer faults
//! and the service-level taxonomy mapped to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Faults surfaced by the storage seams (documents, sessions, users,
/// files).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness violation, e.g. a duplicate login
    #[error("conflict: {0}")]
    Conflict(String),

    /// Filesystem failure in the payload store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

// == Api Error Enum ==
/// Unified error type for the document service API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing/invalid session, failed authorization, or bad credentials
    #[error("Access denied")]
    AccessDenied,

    /// Document id unknown to the store
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Invalid request data, rejected before cache or store are touched
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Underlying persistence or file-storage failure
    #[error("Storage error: {0}")]
    Store(#[source] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Store To Api Mapping ==
impl From<StoreError> for ApiError {
    /// NotFound and Conflict keep their meaning; everything else surfaces
    /// as a storage fault. A backend failure is never masked as NotFound,
    /// nor the other way around.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(msg) => ApiError::InvalidInput(msg),
            other => ApiError::Store(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the document service.
pub type Result<T> = std::result::Result<T, ApiError>;
