//! Process-wide auth configuration.
//!
//! Built once at startup and shared read-only (`Arc<AuthConfig>` or by
//! reference). Every constructor validates eagerly so a misconfigured process
//! fails before serving traffic.

use core::str::FromStr;

use chrono::Duration;

use crate::AuthError;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Symmetric signing secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Rejects a blank secret.
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::configuration("JWT secret is missing"));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// HMAC algorithm used to sign identity tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAlgorithm {
    #[default]
    Hs256,
    Hs384,
    Hs512,
}

impl SigningAlgorithm {
    pub fn as_jwt(self) -> jsonwebtoken::Algorithm {
        match self {
            SigningAlgorithm::Hs256 => jsonwebtoken::Algorithm::HS256,
            SigningAlgorithm::Hs384 => jsonwebtoken::Algorithm::HS384,
            SigningAlgorithm::Hs512 => jsonwebtoken::Algorithm::HS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::Hs256),
            "HS384" => Ok(SigningAlgorithm::Hs384),
            "HS512" => Ok(SigningAlgorithm::Hs512),
            other => Err(AuthError::configuration(format!(
                "unsupported signing algorithm '{other}' (expected HS256, HS384 or HS512)"
            ))),
        }
    }
}

/// Argon2 cost parameters for password hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    pub fn params(&self) -> Result<argon2::Params, AuthError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::configuration(format!("invalid password hash cost: {e}")))
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    secret: SigningSecret,
    algorithm: SigningAlgorithm,
    token_ttl: Duration,
    hash_cost: HashCost,
}

impl AuthConfig {
    /// Configuration with defaults (HS256, 60 minute tokens, default Argon2 cost).
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self {
            secret: SigningSecret::new(secret)?,
            algorithm: SigningAlgorithm::default(),
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            hash_cost: HashCost::default(),
        })
    }

    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Result<Self, AuthError> {
        if minutes <= 0 {
            return Err(AuthError::configuration("token TTL must be a positive number of minutes"));
        }
        self.token_ttl = Duration::try_minutes(minutes)
            .ok_or_else(|| AuthError::configuration("token TTL is too large"))?;
        Ok(self)
    }

    pub fn with_hash_cost(mut self, cost: HashCost) -> Result<Self, AuthError> {
        cost.params()?;
        self.hash_cost = cost;
        Ok(self)
    }

    pub fn secret(&self) -> &SigningSecret {
        &self.secret
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn hash_cost(&self) -> HashCost {
        self.hash_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_secret_is_a_configuration_error() {
        for secret in ["", "   ", "\t\n"] {
            let err = AuthConfig::new(secret).unwrap_err();
            assert_eq!(err, AuthError::Configuration("JWT secret is missing".into()));
        }
    }

    #[test]
    fn defaults() {
        let cfg = AuthConfig::new("s3cret").unwrap();
        assert_eq!(cfg.algorithm(), SigningAlgorithm::Hs256);
        assert_eq!(cfg.token_ttl(), Duration::minutes(60));
        assert_eq!(cfg.hash_cost(), HashCost::default());
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let cfg = AuthConfig::new("super-secret-value").unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn algorithm_parsing() {
        assert_eq!("hs512".parse::<SigningAlgorithm>().unwrap(), SigningAlgorithm::Hs512);
        assert!(matches!("RS256".parse::<SigningAlgorithm>(), Err(AuthError::Configuration(_))));
        assert!(matches!("none".parse::<SigningAlgorithm>(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn ttl_must_be_positive() {
        let cfg = AuthConfig::new("s").unwrap();
        assert!(cfg.clone().with_token_ttl_minutes(0).is_err());
        assert!(cfg.clone().with_token_ttl_minutes(-5).is_err());
        assert_eq!(
            cfg.clone().with_token_ttl_minutes(i64::MAX / 10).unwrap_err(),
            AuthError::Configuration("token TTL is too large".into())
        );
        assert_eq!(cfg.with_token_ttl_minutes(15).unwrap().token_ttl(), Duration::minutes(15));
    }

    #[test]
    fn invalid_hash_cost_is_rejected() {
        let cfg = AuthConfig::new("s").unwrap();
        let bad = HashCost { memory_kib: 1, iterations: 1, parallelism: 1 };
        assert!(matches!(cfg.with_hash_cost(bad), Err(AuthError::Configuration(_))));
    }
}
