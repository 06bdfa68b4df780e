use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fireinv_core::UserId;

use crate::Role;

/// Decoded payload of an identity token.
///
/// Timestamps are JWT NumericDates (whole seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: String,

    /// Display name (username at issuance).
    pub name: String,

    pub role: Role,

    /// Issued-at.
    pub iat: i64,

    /// Expiration; the token is valid strictly before this instant.
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> Result<UserId, TokenValidationError> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| TokenValidationError::MalformedSubject)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token subject is not a valid user id")]
    MalformedSubject,
}

/// Check the time window and subject of already signature-verified claims.
///
/// Valid iff `now < exp` and `sub` parses as a [`UserId`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<UserId, TokenValidationError> {
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    claims.subject()
}
