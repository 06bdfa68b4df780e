use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use fireinv_products::{ProductInput, ProductPatch};

use crate::app::AppServices;
use crate::app::dto::ProductView;
use crate::app::errors::ApiError;
use crate::app::routes::common::json_body;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

/// A malformed body must not hide a missing token: check identity before
/// reporting the body error.
async fn body_or_gate<T>(
    services: &AppServices,
    ctx: &RequestContext,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match json_body(body) {
        Ok(v) => Ok(v),
        Err(e) => {
            services.require_user(ctx).await?;
            Err(e)
        }
    }
}

pub async fn list_products(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    let products: Vec<ProductView> = services
        .products(&ctx)
        .await?
        .into_iter()
        .map(ProductView::from)
        .collect();
    Ok(Json(products).into_response())
}

pub async fn get_product(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let product = services.product(&ctx, &id).await?;
    Ok(Json(ProductView::from(product)).into_response())
}

pub async fn create_product(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = body_or_gate(&services, &ctx, body).await?;
    let product = services.create_product(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(ProductView::from(product))).into_response())
}

pub async fn update_product(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let patch = body_or_gate(&services, &ctx, body).await?;
    let product = services.update_product(&ctx, &id, patch).await?;
    Ok(Json(ProductView::from(product)).into_response())
}

pub async fn delete_product(
    Extension(services): Extension<AppServices>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let deleted = services.delete_product(&ctx, &id).await?;
    Ok(Json(json!({ "deleted": deleted })).into_response())
}
