//! Credential Store: one-way password hashing.
//!
//! Hashes are Argon2id PHC strings with a fresh 16-byte random salt per call.
//! Verification re-derives with the parameters recorded in the stored hash,
//! so raising the configured cost does not invalidate existing credentials.

use argon2::{Algorithm, Argon2, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};

use crate::{AuthError, HashCost};

/// Stored one-way credential (PHC string). Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash loaded from storage. No validation: malformed values simply
    /// never verify.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
}

impl CredentialStore {
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = cost.params()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Salted one-way hash of `secret`.
    pub fn hash(&self, secret: &str) -> Result<CredentialHash, AuthError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| {
            tracing::error!(error = %e, "failed to gather salt entropy");
            AuthError::Internal
        })?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
            tracing::error!(error = %e, "failed to encode salt");
            AuthError::Internal
        })?;
        let phc = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AuthError::Internal
            })?
            .to_string();
        Ok(CredentialHash(phc))
    }

    /// `true` iff `secret` matches `stored`. A malformed stored hash is a
    /// mismatch, not an error.
    pub fn verify(&self, secret: &str, stored: &CredentialHash) -> bool {
        match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => self.argon2.verify_password(secret.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored credential hash is malformed");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn cheap_cost() -> HashCost {
    HashCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}
