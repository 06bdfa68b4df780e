use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use fireinv_auth::{CredentialHash, Role, User, UserStore};
use fireinv_core::{StoreError, UserId};

use crate::db::store_error;

const SELECT_USER: &str = r#"
    SELECT id, username, email, password_hash, role, created_at, updated_at
    FROM users
"#;

/// Postgres-backed user store.
///
/// Expects a `users` table with unique constraints on `username` and `email`.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &PgRow) -> Result<User, StoreError> {
    let id: Uuid = row.try_get("id").map_err(StoreError::backend)?;
    let role: String = row.try_get("role").map_err(StoreError::backend)?;
    let role = Role::from_str(&role).map_err(StoreError::backend)?;
    let password_hash: String = row.try_get("password_hash").map_err(StoreError::backend)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(StoreError::backend)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(StoreError::backend)?;

    Ok(User {
        id: UserId::from_uuid(id),
        username: row.try_get("username").map_err(StoreError::backend)?,
        email: row.try_get("email").map_err(StoreError::backend)?,
        credential: CredentialHash::from_stored(password_hash),
        role,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("{SELECT_USER} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("{SELECT_USER} WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("{SELECT_USER} WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.credential.as_str())
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(user)
    }
}
