//! Typed query/mutation operations.
//!
//! Every protected operation runs the access gate before touching its input
//! or the stores, so "Unauthorized"/"Forbidden" win over validation errors.

use std::sync::Arc;

use chrono::Utc;

use fireinv_auth::{
    AccessGate, AccountService, AuthConfig, AuthError, AuthPayload, CredentialStore,
    IdentityResolver, Role, TokenService, User, UserProfile, UserStore,
};
use fireinv_core::ProductId;
use fireinv_products::{Product, ProductCatalog, ProductInput, ProductPatch, ProductStore};

use crate::app::errors::ApiError;
use crate::config::AdminBootstrap;
use crate::context::RequestContext;

pub const HELLO: &str = "Hello GraphQL";

pub type SharedUserStore = Arc<dyn UserStore>;
pub type SharedProductStore = Arc<dyn ProductStore>;

pub struct Operations {
    gate: AccessGate<SharedUserStore>,
    accounts: AccountService<SharedUserStore>,
    catalog: ProductCatalog<SharedProductStore>,
}

impl Operations {
    pub fn new(
        config: &AuthConfig,
        users: SharedUserStore,
        products: SharedProductStore,
    ) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::new(config));
        let credentials = CredentialStore::new(config.hash_cost())?;

        Ok(Self {
            gate: AccessGate::new(IdentityResolver::new(tokens.clone(), users.clone())),
            accounts: AccountService::new(credentials, tokens, users),
            catalog: ProductCatalog::new(products),
        })
    }

    /// Create the configured admin account if it does not exist yet.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> Result<Option<User>, AuthError> {
        self.accounts
            .ensure_admin(&admin.username, &admin.email, &admin.password, Utc::now())
            .await
    }

    /// Run the "must be authenticated" check on its own.
    pub async fn require_user(&self, ctx: &RequestContext) -> Result<User, ApiError> {
        Ok(self.gate.require_user(ctx.headers()).await?)
    }

    // queries

    pub fn hello(&self) -> &'static str {
        HELLO
    }

    pub async fn me(&self, ctx: &RequestContext) -> Result<UserProfile, ApiError> {
        let user = self.gate.require_user(ctx.headers()).await?;
        Ok(user.profile())
    }

    pub async fn products(&self, ctx: &RequestContext) -> Result<Vec<Product>, ApiError> {
        self.gate.require_user(ctx.headers()).await?;
        Ok(self.catalog.list().await?)
    }

    pub async fn product(&self, ctx: &RequestContext, id: &str) -> Result<Product, ApiError> {
        self.gate.require_user(ctx.headers()).await?;
        let id: ProductId = id.parse()?;
        Ok(self.catalog.get(id).await?)
    }

    // mutations

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        Ok(self
            .accounts
            .register(username, email, password, Utc::now())
            .await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthPayload, ApiError> {
        Ok(self.accounts.login(username, password, Utc::now()).await?)
    }

    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        input: ProductInput,
    ) -> Result<Product, ApiError> {
        let user = self.gate.require_user(ctx.headers()).await?;
        let product = self.catalog.create(input, Utc::now()).await?;
        tracing::debug!(user_id = %user.id, product_id = %product.id, "createProduct");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product, ApiError> {
        let user = self.gate.require_user(ctx.headers()).await?;
        let id: ProductId = id.parse()?;
        let product = self.catalog.update(id, patch, Utc::now()).await?;
        tracing::debug!(user_id = %user.id, product_id = %product.id, "updateProduct");
        Ok(product)
    }

    /// Admin only; `true` once the product is gone.
    pub async fn delete_product(&self, ctx: &RequestContext, id: &str) -> Result<bool, ApiError> {
        let user = self.gate.require_role(ctx.headers(), Role::Admin).await?;
        let id: ProductId = id.parse()?;
        self.catalog.delete(id).await?;
        tracing::debug!(user_id = %user.id, product_id = %id, "deleteProduct");
        Ok(true)
    }
}
