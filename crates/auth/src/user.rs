//! User record as read by the auth core.
//!
//! The record is owned by the persistence collaborator ([`crate::UserStore`]);
//! this crate only creates it at registration and reads it afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fireinv_core::UserId;

use crate::{CredentialHash, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub credential: CredentialHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        credential: CredentialHash,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            credential,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Public view of a user (no email, no credential).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}
