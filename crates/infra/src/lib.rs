//! Infrastructure layer: persistence collaborators for users and products.
//!
//! Each store comes in two flavours: an in-memory one for tests/dev and a
//! Postgres one (`sqlx`) for deployment. Schema management is external; the
//! Postgres stores assume the `users` and `products` tables exist.

pub mod db;
pub mod products;
pub mod users;

pub use products::{InMemoryProductStore, PostgresProductStore};
pub use users::{InMemoryUserStore, PostgresUserStore};
