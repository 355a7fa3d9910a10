// API error kinds and their HTTP mapping

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use kassie_db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds surfaced by the service layer, mapped onto HTTP status codes
/// by the `ResponseError` impl below.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed, expired, or wrong-kind token; unknown or expired session
    #[error("{0}")]
    Unauthenticated(String),

    /// Empty or rejected request fields
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown profile, table, or cursor
    #[error("{0}")]
    NotFound(String),

    /// Driver call exceeded its timeout
    #[error("{0}")]
    DeadlineExceeded(String),

    /// Cluster unreachable or pool shut down
    #[error("{0}")]
    Unavailable(String),

    /// Unexpected failure: row decoding, token signing, driver surprises
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::NotFound(_) => "not_found",
            ApiError::DeadlineExceeded(_) => "deadline_exceeded",
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Internal(_) => "internal",
        }
    }
}

/// JSON body attached to every error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorResponse::new(self.code(), self.to_string()))
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Timeout => ApiError::DeadlineExceeded("query timed out".to_string()),
            DbError::NoHosts
            | DbError::InvalidPort
            | DbError::ConnectionFailed(_)
            | DbError::PoolClosed
            | DbError::NotFound(_)
            | DbError::HandleClosed(_) => ApiError::Unavailable(e.to_string()),
            DbError::QueryFailed(_) | DbError::Decode(_) => ApiError::Internal(e.to_string()),
        }
    }
}
