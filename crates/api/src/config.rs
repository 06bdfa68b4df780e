//! Process configuration, read once at startup.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use fireinv_auth::{AuthConfig, AuthError, HashCost, SigningAlgorithm};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0}")]
    Auth(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{0} must be set together with ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD")]
    IncompleteAdmin(&'static str),
}

impl From<AuthError> for ConfigurationError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Configuration(msg) => Self::Auth(msg),
            other => Self::Auth(other.to_string()),
        }
    }
}

/// Credentials for the account created at startup if missing.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut auth = AuthConfig::new(get("JWT_SECRET").unwrap_or_default())?;

        if let Some(raw) = get("JWT_ALGORITHM") {
            let algorithm = SigningAlgorithm::from_str(&raw)?;
            auth = auth.with_algorithm(algorithm);
        }
        if let Some(minutes) = parse::<i64>(&get, "JWT_EXPIRES_MINUTES")? {
            auth = auth.with_token_ttl_minutes(minutes)?;
        }

        let mut cost = HashCost::default();
        let mut cost_overridden = false;
        if let Some(kib) = parse::<u32>(&get, "PASSWORD_HASH_MEMORY_KIB")? {
            cost.memory_kib = kib;
            cost_overridden = true;
        }
        if let Some(iterations) = parse::<u32>(&get, "PASSWORD_HASH_ITERATIONS")? {
            cost.iterations = iterations;
            cost_overridden = true;
        }
        if cost_overridden {
            auth = auth.with_hash_cost(cost)?;
        }

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigurationError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            auth,
            bind_addr,
            database_url: get("DATABASE_URL"),
            admin: admin_bootstrap(&get)?,
        })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigurationError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigurationError::Invalid {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn admin_bootstrap(
    get: &impl Fn(&str) -> Option<String>,
) -> Result<Option<AdminBootstrap>, ConfigurationError> {
    let username = get("ADMIN_USERNAME");
    let email = get("ADMIN_EMAIL");
    let password = get("ADMIN_PASSWORD");

    match (username, email, password) {
        (None, None, None) => Ok(None),
        (Some(username), Some(email), Some(password)) => Ok(Some(AdminBootstrap {
            username,
            email,
            password,
        })),
        (None, _, _) => Err(ConfigurationError::IncompleteAdmin("ADMIN_USERNAME")),
        (_, None, _) => Err(ConfigurationError::IncompleteAdmin("ADMIN_EMAIL")),
        (_, _, None) => Err(ConfigurationError::IncompleteAdmin("ADMIN_PASSWORD")),
    }
}
