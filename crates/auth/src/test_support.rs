//! In-crate store doubles for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use fireinv_core::{StoreError, UserId};

use crate::{CredentialHash, Role, User, UserStore};

pub(crate) fn user(username: &str, role: Role) -> User {
    User::new(
        username,
        format!("{username}@example.com"),
        CredentialHash::from_stored("not-a-real-hash"),
        role,
        Utc::now(),
    )
}

#[derive(Default)]
pub(crate) struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    /// Pretend the pre-check found nothing even when a row exists.
    hide_from_lookups: bool,
}

impl MemoryUserStore {
    /// Store whose lookups always miss, so uniqueness is only caught by `insert`.
    pub(crate) fn racing() -> Self {
        Self {
            hide_from_lookups: true,
            ..Self::default()
        }
    }

    pub(crate) fn add(&self, user: User) -> User {
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub(crate) fn remove(&self, id: UserId) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        if self.hide_from_lookups {
            return None;
        }
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username || u.email == user.email) {
            return Err(StoreError::Conflict("users_username_or_email".into()));
        }
        users.push(user.clone());
        Ok(user)
    }
}

pub(crate) struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn insert(&self, _user: User) -> Result<User, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}
