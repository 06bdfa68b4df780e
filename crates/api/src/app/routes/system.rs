use axum::{Json, extract::Extension};
use serde_json::{Value, json};

use crate::app::AppServices;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

pub async fn hello(Extension(services): Extension<AppServices>) -> Json<Value> {
    Json(json!({ "hello": services.hello() }))
}
