//! `fireinv-auth`: authentication/authorization core.
//!
//! Leaves first:
//! - [`credential`]: one-way password hashing (Argon2id)
//! - [`token`]: signed, time-limited identity tokens (JWT)
//! - [`resolver`]: bearer token → persisted [`User`]
//! - [`gate`]: "must be authenticated" / "must hold role X" policies
//!
//! Storage is consumed through the [`UserStore`] trait; HTTP is only touched
//! through `http::HeaderMap` for header access.

pub mod accounts;
pub mod claims;
pub mod config;
pub mod credential;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod role;
pub mod store;
pub mod token;
pub mod user;

#[cfg(test)]
mod test_support;

pub use accounts::{AccountService, AuthPayload};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use config::{AuthConfig, DEFAULT_TOKEN_TTL_MINUTES, HashCost, SigningAlgorithm, SigningSecret};
pub use credential::{CredentialHash, CredentialStore};
pub use error::AuthError;
pub use gate::{AccessGate, authorize_role};
pub use resolver::{AnonymousReason, IdentityResolver, Resolution, bearer_token};
pub use role::{Role, UnknownRole};
pub use store::UserStore;
pub use token::TokenService;
pub use user::{User, UserProfile};
