use crate::generation::GenerationError;
use crate::linkedin::LinkedInError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure
    pub detail: String,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Internal Server Error (500) with a detail message
    pub fn internal<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = ErrorBody {
            detail: self.detail,
        };
        (status_code, Json(body)).into_response()
    }
}

/// Failures of the login and publish flows
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed caller input
    #[error("{0}")]
    Validation(String),
    /// Missing or rejected authorization code, or a state mismatch
    #[error("{0}")]
    Authorization(String),
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(#[source] LinkedInError),
    #[error("Failed to fetch LinkedIn profile: {0}")]
    IdentityFetch(#[source] LinkedInError),
    #[error("Failed to generate post content: {0}")]
    Generation(#[from] GenerationError),
    #[error("Failed to publish post to LinkedIn: {0}")]
    Publish(#[source] LinkedInError),
}

impl AppError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Authorization(_) => StatusCode::BAD_REQUEST,
            // LinkedIn 4xx: the code or the token was refused
            AppError::TokenExchange(err) | AppError::IdentityFetch(err) => match err.status() {
                Some(status) if status.is_client_error() => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Publish(err) => match err.status() {
                Some(status) if !status.is_success() => status,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::new(err.to_string(), err.status_code())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        ApiError::from(self).into_response()
    }
}
