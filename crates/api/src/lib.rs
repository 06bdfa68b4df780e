//! HTTP API: configuration, typed operations, and the axum surface.

pub mod app;
pub mod config;
pub mod context;
pub mod operations;
