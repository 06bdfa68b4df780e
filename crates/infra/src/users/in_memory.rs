use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use fireinv_auth::{User, UserStore};
use fireinv_core::{StoreError, UserId};

/// In-memory user store for tests/dev.
///
/// `insert` holds the write lock across the uniqueness check, so two racing
/// registrations cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Result<Option<User>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("user store lock poisoned"))?;
        Ok(map.values().find(|u| pred(u)).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.find(|u| u.id == id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find(|u| u.username == username)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find(|u| u.email == email)
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("user store lock poisoned"))?;

        if map.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }
        if map.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }
        if map.contains_key(&user.id) {
            return Err(StoreError::Conflict("users_pkey".to_string()));
        }

        map.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fireinv_auth::{CredentialHash, Role};

    fn user(username: &str, email: &str) -> User {
        User::new(
            username,
            email,
            CredentialHash::from_stored("$argon2id$stub"),
            Role::User,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn inserted_user_is_found_by_every_key() {
        let store = InMemoryUserStore::new();
        let alice = store.insert(user("alice", "a@x.io")).await.unwrap();

        assert_eq!(store.find_by_id(alice.id).await.unwrap(), Some(alice.clone()));
        assert_eq!(store.find_by_username("alice").await.unwrap(), Some(alice.clone()));
        assert_eq!(store.find_by_email("a@x.io").await.unwrap(), Some(alice));
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.insert(user("alice", "a@x.io")).await.unwrap();

        let err = store.insert(user("alice", "other@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store.insert(user("bob", "a@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookups_are_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.insert(user("alice", "a@x.io")).await.unwrap();
        assert!(store.find_by_username("Alice").await.unwrap().is_none());
    }
}
