//! Token Service: issues and verifies signed, time-limited identity tokens.
//!
//! Tokens are HMAC-signed JWTs. The key, algorithm and TTL come from
//! [`AuthConfig`] and are fixed for the life of the service. Expiry is checked
//! against a caller-supplied `now` rather than the library's own clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use fireinv_core::UserId;

use crate::{AuthConfig, AuthError, Claims, Role, validate_claims};

#[derive(Clone)]
pub struct TokenService {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.header.alg)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// A validated [`AuthConfig`] always carries a non-blank secret, so
    /// construction cannot fail.
    pub fn new(config: &AuthConfig) -> Self {
        let algorithm = config.algorithm().as_jwt();
        let secret = config.secret().as_bytes();

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp", "sub"].into_iter().map(String::from).collect();

        Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: config.token_ttl(),
        }
    }

    /// Sign a token for `subject` that expires `ttl` after `now`.
    pub fn issue(
        &self,
        subject: UserId,
        display_name: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let issued_at = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            name: display_name.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + self.ttl.num_seconds(),
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign identity token");
            AuthError::Internal
        })
    }

    /// Decode `token`, checking signature, algorithm, expiry and subject.
    ///
    /// Every failure is reported as [`AuthError::Authentication`]; the cause is
    /// only logged at debug level.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "identity token rejected");
                AuthError::Authentication
            })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(reason = %e, "identity token rejected");
            AuthError::Authentication
        })?;

        Ok(data.claims)
    }
}
