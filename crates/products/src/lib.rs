//! Product catalog.
//!
//! Field validation lives on [`Product`]; persistence is reached through the
//! [`ProductStore`] trait. Access control is the caller's job (the API layer
//! runs the auth gate before any catalog call).

pub mod catalog;
pub mod product;
pub mod store;

pub use catalog::{ProductCatalog, ProductError};
pub use product::{Price, Product, ProductInput, ProductPatch};
pub use store::ProductStore;
