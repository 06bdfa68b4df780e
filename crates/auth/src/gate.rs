//! Access Gate: authentication and role policies at the entry of protected
//! operations.
//!
//! - No state across requests
//! - Identity first, role second: an anonymous request to an admin-only
//!   operation is `Unauthorized`, never `Forbidden`

use chrono::{DateTime, Utc};
use http::HeaderMap;

use crate::{AuthError, IdentityResolver, Role, User, UserStore};

/// Pure role check for an already resolved user.
pub fn authorize_role(user: &User, required: Role) -> Result<(), AuthError> {
    if user.has_role(required) {
        Ok(())
    } else {
        Err(AuthError::Authorization)
    }
}

pub struct AccessGate<S> {
    resolver: IdentityResolver<S>,
}

impl<S> AccessGate<S>
where
    S: UserStore,
{
    pub fn new(resolver: IdentityResolver<S>) -> Self {
        Self { resolver }
    }

    pub async fn require_user(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        self.require_user_at(headers, Utc::now()).await
    }

    pub async fn require_role(&self, headers: &HeaderMap, role: Role) -> Result<User, AuthError> {
        self.require_role_at(headers, role, Utc::now()).await
    }

    pub async fn require_user_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        self.resolver
            .resolve_at(headers, now)
            .await
            .into_user()
            .ok_or(AuthError::Authentication)
    }

    pub async fn require_role_at(
        &self,
        headers: &HeaderMap,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        let user = self.require_user_at(headers, now).await?;
        if let Err(e) = authorize_role(&user, role) {
            tracing::info!(user_id = %user.id, required = %role, actual = %user.role, "role check denied");
            return Err(e);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::HeaderValue;
    use http::header::AUTHORIZATION;

    use super::*;
    use crate::test_support::{MemoryUserStore, user};
    use crate::{AuthConfig, TokenService};

    struct Fixture {
        tokens: Arc<TokenService>,
        store: Arc<MemoryUserStore>,
        gate: AccessGate<Arc<MemoryUserStore>>,
    }

    fn fixture() -> Fixture {
        let tokens = Arc::new(TokenService::new(&AuthConfig::new("gate-secret").unwrap()));
        let store = Arc::new(MemoryUserStore::default());
        let gate = AccessGate::new(IdentityResolver::new(tokens.clone(), store.clone()));
        Fixture { tokens, store, gate }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        headers
    }

    impl Fixture {
        fn login(&self, u: &User) -> HeaderMap {
            bearer(&self.tokens.issue(u.id, &u.username, u.role, Utc::now()).unwrap())
        }
    }

    #[test]
    fn authorize_role_compares_exactly() {
        let admin = user("root", Role::Admin);
        let plain = user("alice", Role::User);
        assert_eq!(authorize_role(&admin, Role::Admin), Ok(()));
        assert_eq!(authorize_role(&plain, Role::User), Ok(()));
        assert_eq!(authorize_role(&plain, Role::Admin), Err(AuthError::Authorization));
        assert_eq!(authorize_role(&admin, Role::User), Err(AuthError::Authorization));
    }

    #[tokio::test]
    async fn require_user_without_header_is_unauthorized() {
        let f = fixture();
        let err = f.gate.require_user(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err, AuthError::Authentication);
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn require_user_returns_resolved_user() {
        let f = fixture();
        let alice = f.store.add(user("alice", Role::User));
        let got = f.gate.require_user(&f.login(&alice)).await.unwrap();
        assert_eq!(got.id, alice.id);
    }

    #[tokio::test]
    async fn require_user_for_deleted_user_is_unauthorized() {
        let f = fixture();
        let alice = f.store.add(user("alice", Role::User));
        let headers = f.login(&alice);
        f.store.remove(alice.id);
        assert_eq!(f.gate.require_user(&headers).await, Err(AuthError::Authentication));
    }

    #[tokio::test]
    async fn require_role_admin_for_user_is_forbidden() {
        let f = fixture();
        let alice = f.store.add(user("alice", Role::User));
        let err = f.gate.require_role(&f.login(&alice), Role::Admin).await.unwrap_err();
        assert_eq!(err, AuthError::Authorization);
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[tokio::test]
    async fn require_role_admin_unauthenticated_is_unauthorized() {
        let f = fixture();
        assert_eq!(
            f.gate.require_role(&HeaderMap::new(), Role::Admin).await,
            Err(AuthError::Authentication)
        );
        assert_eq!(
            f.gate.require_role(&bearer("forged.token.value"), Role::Admin).await,
            Err(AuthError::Authentication)
        );
    }

    #[tokio::test]
    async fn require_role_admin_for_admin_succeeds() {
        let f = fixture();
        let root = f.store.add(user("root", Role::Admin));
        let got = f.gate.require_role(&f.login(&root), Role::Admin).await.unwrap();
        assert_eq!(got.role, Role::Admin);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized_at_check_time() {
        let f = fixture();
        let alice = f.store.add(user("alice", Role::User));
        let headers = f.login(&alice);
        let later = Utc::now() + chrono::Duration::minutes(61);
        assert_eq!(
            f.gate.require_user_at(&headers, later).await,
            Err(AuthError::Authentication)
        );
    }
}
