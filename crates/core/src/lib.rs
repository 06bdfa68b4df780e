//! `fireinv-core`: shared domain primitives (ids and the domain error model).
//!
//! This crate has no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, StoreError};
pub use id::{ProductId, UserId};
