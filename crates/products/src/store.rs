use std::sync::Arc;

use async_trait::async_trait;

use fireinv_core::{ProductId, StoreError};

use crate::Product;

/// Persistence collaborator for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;
    /// Replace an existing product; `None` if it does not exist.
    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError>;
    /// `true` if a product was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
