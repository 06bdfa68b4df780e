use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::app::errors::ApiError;

/// Unwrap a JSON body, reporting a malformed one in the uniform error shape.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}
