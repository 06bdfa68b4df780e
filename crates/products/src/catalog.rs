//! Catalog operations: validation plus persistence.

use chrono::{DateTime, Utc};
use thiserror::Error;

use fireinv_core::{DomainError, ProductId, StoreError};

use crate::{Product, ProductInput, ProductPatch, ProductStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Store failure; the detail is for logs only.
    #[error("internal error")]
    Store(#[from] StoreError),
}

pub struct ProductCatalog<S> {
    store: S,
}

impl<S> ProductCatalog<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, ProductError> {
        self.store.get(id).await?.ok_or(ProductError::Domain(DomainError::NotFound))
    }

    pub async fn create(&self, input: ProductInput, now: DateTime<Utc>) -> Result<Product, ProductError> {
        let product = Product::create(input, now)?;
        let product = self.store.insert(product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product, ProductError> {
        let mut product = self.get(id).await?;
        product.apply_patch(patch, now)?;
        let product = self
            .store
            .update(product)
            .await?
            .ok_or(ProductError::Domain(DomainError::NotFound))?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        if !self.store.delete(id).await? {
            return Err(DomainError::NotFound.into());
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct MapStore(Mutex<BTreeMap<ProductId, Product>>);

    #[async_trait]
    impl ProductStore for MapStore {
        async fn list(&self) -> Result<Vec<Product>, StoreError> {
            Ok(self.0.lock().unwrap().values().cloned().collect())
        }

        async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
            Ok(self.0.lock().unwrap().get(&id).cloned())
        }

        async fn insert(&self, product: Product) -> Result<Product, StoreError> {
            self.0.lock().unwrap().insert(product.id, product.clone());
            Ok(product)
        }

        async fn update(&self, product: Product) -> Result<Option<Product>, StoreError> {
            let mut map = self.0.lock().unwrap();
            if !map.contains_key(&product.id) {
                return Ok(None);
            }
            map.insert(product.id, product.clone());
            Ok(Some(product))
        }

        async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
            Ok(self.0.lock().unwrap().remove(&id).is_some())
        }
    }

    fn input(name: &str) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: None,
            price: 10.0,
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn create_get_list() {
        let catalog = ProductCatalog::new(MapStore::default());
        let a = catalog.create(input("Hose reel"), Utc::now()).await.unwrap();
        let b = catalog.create(input("Fire blanket"), Utc::now()).await.unwrap();

        assert_eq!(catalog.get(a.id).await.unwrap(), a);
        let listed = catalog.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a) && listed.contains(&b));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let catalog = ProductCatalog::new(MapStore::default());
        let err = catalog.create(input("x"), Utc::now()).await.unwrap_err();
        assert!(matches!(err, ProductError::Domain(DomainError::Validation(_))));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete() {
        let catalog = ProductCatalog::new(MapStore::default());
        let p = catalog.create(input("Hose reel"), Utc::now()).await.unwrap();

        let patch = ProductPatch { quantity: Some(7), ..Default::default() };
        let updated = catalog.update(p.id, patch, Utc::now()).await.unwrap();
        assert_eq!(updated.quantity, 7);

        catalog.delete(p.id).await.unwrap();
        assert_eq!(catalog.get(p.id).await, Err(ProductError::Domain(DomainError::NotFound)));
        assert_eq!(catalog.delete(p.id).await, Err(ProductError::Domain(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let catalog = ProductCatalog::new(MapStore::default());
        let err = catalog
            .update(ProductId::new(), ProductPatch::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, ProductError::Domain(DomainError::NotFound));
    }
}
