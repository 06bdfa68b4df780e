//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Messages of `Validation` and `Conflict` are user-facing and rendered
/// verbatim by the API layer, so they are phrased for end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed validation (e.g. "name required").
    #[error("{0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Failure reported by a persistence collaborator.
///
/// `Backend` carries driver detail for logs only; callers must not forward it
/// to end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write (duplicate username, email, ...).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The backing store failed (connection, decoding, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl core::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_are_verbatim() {
        assert_eq!(DomainError::validation("name required").to_string(), "name required");
        assert_eq!(
            DomainError::conflict("Username already exists").to_string(),
            "Username already exists"
        );
        assert_eq!(DomainError::not_found().to_string(), "not found");
    }
}
