use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::app::AppServices;
use crate::app::dto::{LoginRequest, RegisterRequest};
use crate::app::errors::ApiError;
use crate::app::routes::common::json_body;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<AppServices>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(body)?;
    let payload = services
        .register(&body.username, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub async fn login(
    Extension(services): Extension<AppServices>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(body)?;
    let payload = services.login(&body.username, &body.password).await?;
    Ok(Json(payload).into_response())
}

pub async fn me(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let me = services.me(&ctx).await?;
    Ok(Json(me).into_response())
}
