use axum::{Router, routing::get};

pub mod auth;
pub mod common;
pub mod products;
pub mod system;

/// Router for account and catalog endpoints. Each handler runs its own
/// access check through the operations layer.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(auth::me))
        .nest("/auth", auth::router())
        .nest("/products", products::router())
}
