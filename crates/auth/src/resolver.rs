//! Identity Resolver: bearer token → persisted user.
//!
//! Resolution never fails: every problem downgrades to an anonymous outcome.
//! The reason is kept in [`Resolution`] (and logged) but is not meant for the
//! caller's users; turning "anonymous" into "Unauthorized" is the gate's job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::{TokenService, User, UserStore};

const BEARER_PREFIX: &str = "bearer ";

/// Why a request resolved to no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousReason {
    MissingHeader,
    MalformedHeader,
    InvalidToken,
    UnknownSubject,
    StoreUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Authenticated(User),
    Anonymous(AnonymousReason),
}

impl Resolution {
    pub fn into_user(self) -> Option<User> {
        match self {
            Resolution::Authenticated(user) => Some(user),
            Resolution::Anonymous(_) => None,
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header name and the `Bearer` scheme are matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AnonymousReason> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AnonymousReason::MissingHeader)?
        .to_str()
        .map_err(|_| AnonymousReason::MalformedHeader)?;

    let scheme = value
        .get(..BEARER_PREFIX.len())
        .ok_or(AnonymousReason::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(AnonymousReason::MalformedHeader);
    }

    let token = value[BEARER_PREFIX.len()..].trim();
    if token.is_empty() {
        return Err(AnonymousReason::MalformedHeader);
    }
    Ok(token)
}

pub struct IdentityResolver<S> {
    tokens: Arc<TokenService>,
    users: S,
}

impl<S> IdentityResolver<S>
where
    S: UserStore,
{
    pub fn new(tokens: Arc<TokenService>, users: S) -> Self {
        Self { tokens, users }
    }

    /// The user behind the request's bearer token, if any.
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<User> {
        self.resolve_at(headers, Utc::now()).await.into_user()
    }

    /// Full resolution outcome, checking token expiry against `now`.
    pub async fn resolve_at(&self, headers: &HeaderMap, now: DateTime<Utc>) -> Resolution {
        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(reason) => return Resolution::Anonymous(reason),
        };

        let Some(user_id) = self
            .tokens
            .verify(token, now)
            .ok()
            .and_then(|claims| claims.subject().ok())
        else {
            return anonymous(AnonymousReason::InvalidToken);
        };

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Resolution::Authenticated(user),
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "token subject has no user record");
                anonymous(AnonymousReason::UnknownSubject)
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "user lookup failed during identity resolution");
                anonymous(AnonymousReason::StoreUnavailable)
            }
        }
    }
}

fn anonymous(reason: AnonymousReason) -> Resolution {
    tracing::debug!(?reason, "request resolved to no identity");
    Resolution::Anonymous(reason)
}
