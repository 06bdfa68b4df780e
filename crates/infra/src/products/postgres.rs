use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use fireinv_core::{ProductId, StoreError};
use fireinv_products::{Price, Product, ProductStore};

use crate::db::store_error;

// `price` is NUMERIC(10,2); cents cross the wire as BIGINT so no float
// rounding happens in transit.
const SELECT_PRODUCT: &str = r#"
    SELECT id, name, description, (price * 100)::BIGINT AS price_cents,
           quantity, created_at, updated_at
    FROM products
"#;

/// Postgres-backed product store.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let id: Uuid = row.try_get("id").map_err(StoreError::backend)?;
    let cents: i64 = row.try_get("price_cents").map_err(StoreError::backend)?;
    let cents = u64::try_from(cents).map_err(StoreError::backend)?;
    let price = Price::from_cents(cents).map_err(StoreError::backend)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(StoreError::backend)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(StoreError::backend)?;

    Ok(Product {
        id: ProductId::from_uuid(id),
        name: row.try_get("name").map_err(StoreError::backend)?,
        description: row.try_get("description").map_err(StoreError::backend)?,
        price,
        quantity: row.try_get("quantity").map_err(StoreError::backend)?,
        created_at,
        updated_at,
    })
}

fn cents(price: Price) -> i64 {
    // MAX_CENTS fits comfortably in i64.
    price.cents() as i64
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("{SELECT_PRODUCT} ORDER BY created_at, id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        rows.iter().map(row_to_product).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4::numeric / 100, $5, $6, $7)
            "#,
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(cents(product.price))
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4::numeric / 100,
                quantity = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(cents(product.price))
        .bind(product.quantity)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok((result.rows_affected() > 0).then_some(product))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
