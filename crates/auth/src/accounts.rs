//! Registration and login flows.
//!
//! Both flows validate input per field before touching the store, and both
//! end by issuing an identity token for the user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use fireinv_core::StoreError;

use crate::{AuthError, CredentialHash, CredentialStore, Role, TokenService, User, UserProfile, UserStore};

pub const MIN_PASSWORD_LEN: usize = 6;

const USERNAME_REQUIRED: &str = "username required";
const EMAIL_REQUIRED: &str = "email required";
const PASSWORD_REQUIRED: &str = "password required";
const PASSWORD_TOO_SHORT: &str = "password required (min 6)";

const USERNAME_TAKEN: &str = "Username already exists";
const EMAIL_TAKEN: &str = "Email already exists";
const USERNAME_OR_EMAIL_TAKEN: &str = "Username already exists or Email already exists";

/// Result of a successful register/login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

pub struct AccountService<S> {
    credentials: CredentialStore,
    tokens: Arc<TokenService>,
    users: S,
}

impl<S> AccountService<S>
where
    S: UserStore,
{
    pub fn new(credentials: CredentialStore, tokens: Arc<TokenService>, users: S) -> Self {
        Self {
            credentials,
            tokens,
            users,
        }
    }

    /// Create a `USER` account and sign it in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthPayload, AuthError> {
        let (username, email) = validate_registration(username, email, password)?;
        let user = self.create_user(username, email, password, Role::User, now).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        self.payload(&user, now)
    }

    /// Check credentials and sign the user in.
    ///
    /// Unknown username and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthPayload, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::validation(USERNAME_REQUIRED));
        }
        if password.trim().is_empty() {
            return Err(AuthError::validation(PASSWORD_REQUIRED));
        }

        let Some(user) = self.users.find_by_username(username).await.map_err(internal)? else {
            tracing::info!(username = %username, "login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password, &user.credential).await? {
            tracing::info!(username = %username, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, username = %username, "user logged in");
        self.payload(&user, now)
    }

    /// Create an `ADMIN` account unless the username is already taken.
    ///
    /// Returns the created user, or `None` when an account with that username
    /// exists (whatever its role).
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError> {
        let (username, email) = validate_registration(username, email, password)?;
        if self.users.find_by_username(username).await.map_err(internal)?.is_some() {
            tracing::info!(username = %username, "bootstrap admin already present");
            return Ok(None);
        }
        let user = self.create_user(username, email, password, Role::Admin, now).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "bootstrap admin created");
        Ok(Some(user))
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        if self.users.find_by_username(username).await.map_err(internal)?.is_some() {
            return Err(AuthError::conflict(USERNAME_TAKEN));
        }
        if self.users.find_by_email(email).await.map_err(internal)?.is_some() {
            return Err(AuthError::conflict(EMAIL_TAKEN));
        }

        let credential = self.hash(password).await?;
        let user = User::new(username, email, credential, role, now);

        match self.users.insert(user).await {
            Ok(user) => Ok(user),
            Err(StoreError::Conflict(constraint)) => {
                tracing::info!(%constraint, "registration lost a uniqueness race");
                Err(AuthError::conflict(USERNAME_OR_EMAIL_TAKEN))
            }
            Err(e) => Err(internal(e)),
        }
    }

    fn payload(&self, user: &User, now: DateTime<Utc>) -> Result<AuthPayload, AuthError> {
        let token = self.tokens.issue(user.id, &user.username, user.role, now)?;
        Ok(AuthPayload {
            token,
            user: user.profile(),
        })
    }

    // Argon2 is deliberately slow; keep it off the async workers.
    async fn hash(&self, password: &str) -> Result<CredentialHash, AuthError> {
        let credentials = self.credentials.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AuthError::Internal
            })?
    }

    async fn verify(&self, password: &str, stored: &CredentialHash) -> Result<bool, AuthError> {
        let credentials = self.credentials.clone();
        let password = password.to_owned();
        let stored = stored.clone();
        tokio::task::spawn_blocking(move || credentials.verify(&password, &stored))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password verification task failed");
                AuthError::Internal
            })
    }
}

/// Trimmed `(username, email)` if the registration input is acceptable.
fn validate_registration<'a>(
    username: &'a str,
    email: &'a str,
    password: &str,
) -> Result<(&'a str, &'a str), AuthError> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() {
        return Err(AuthError::validation(USERNAME_REQUIRED));
    }
    if email.is_empty() {
        return Err(AuthError::validation(EMAIL_REQUIRED));
    }
    if password.trim().is_empty() {
        return Err(AuthError::validation(PASSWORD_REQUIRED));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::validation(PASSWORD_TOO_SHORT));
    }
    Ok((username, email))
}

fn internal(err: StoreError) -> AuthError {
    tracing::error!(error = %err, "user store failure");
    AuthError::Internal
}
