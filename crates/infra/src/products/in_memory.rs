use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use fireinv_core::{ProductId, StoreError};
use fireinv_products::{Product, ProductStore};

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::backend("product store lock poisoned")
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut out: Vec<Product> = map.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(&product.id) {
            return Err(StoreError::Conflict("products_pkey".to_string()));
        }
        map.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(&product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }
}
