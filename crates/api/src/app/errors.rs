//! Uniform error rendering: `{"errors":[{"message": ..., "code": ...}]}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use fireinv_auth::AuthError;
use fireinv_core::DomainError;
use fireinv_products::ProductError;

/// Caller-facing failure of an operation.
///
/// Messages are safe to show; internal detail is logged where the error is
/// converted and never carried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "BAD_USER_INPUT",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Authentication => Self::Unauthorized,
            AuthError::Authorization => Self::Forbidden,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::Conflict(msg) => Self::Conflict(msg),
            AuthError::Configuration(msg) => {
                tracing::error!(error = %msg, "auth configuration error at request time");
                Self::Internal
            }
            AuthError::Internal => Self::Internal,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound,
            DomainError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(value: ProductError) -> Self {
        match value {
            ProductError::Domain(e) => e.into(),
            ProductError::Store(e) => {
                tracing::error!(error = %e, "product store failure");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "errors": [{
                "message": message.into(),
                "code": code,
            }],
        })),
    )
        .into_response()
}
