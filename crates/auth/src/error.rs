//! Error taxonomy of the auth core.
//!
//! Display strings are the user-facing messages. Internal detail (crypto or
//! store errors) is logged where it happens and never carried in a variant.

use thiserror::Error;

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const FORBIDDEN: &str = "Forbidden";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or invalid process configuration (fatal at startup).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No valid identity could be established.
    #[error("Unauthorized")]
    Authentication,

    /// A valid identity lacks the required role.
    #[error("Forbidden")]
    Authorization,

    /// Login failed (unknown user or wrong password, indistinguishable).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Uniqueness violation on registration.
    #[error("{0}")]
    Conflict(String),

    /// Malformed credential input, reported per field.
    #[error("{0}")]
    Validation(String),

    /// Normalized internal failure (crypto, store, task join).
    #[error("internal error")]
    Internal,
}

impl AuthError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
