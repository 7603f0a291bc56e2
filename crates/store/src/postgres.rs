//! Postgres-backed product store.
//!
//! Each operation runs to completion inside one request; the `update` path
//! wraps its read-merge-write in a transaction with `FOR UPDATE`. The
//! `uq_products_sku` unique constraint (see [`crate::schema`]) is the
//! authoritative uniqueness guard; application-level pre-checks only improve
//! the error message in the non-racing case.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use panaderia_catalog::{Category, NewProduct, Product, ProductPatch};

use crate::product_store::{Page, ProductFilter, ProductStore, StoreError};

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let category: String = row.try_get("category")?;
    let category = category
        .parse::<Category>()
        .map_err(|e| StoreError::Decode(e.to_string()))?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        category,
        unit_price: row.try_get("unit_price")?,
        stock: row.try_get("stock")?,
        available: row.try_get("available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_unique_violation(sku: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateSku(sku.to_string())
        }
        _ => StoreError::Database(err),
    }
}

/// Escape LIKE metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        // Best-effort early exit; the unique constraint closes the race.
        if self.get_by_sku(&new.sku).await?.is_some() {
            return Err(StoreError::DuplicateSku(new.sku));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO products (name, sku, category, unit_price, stock, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, sku, category, unit_price, stock, available,
                      created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.sku)
        .bind(new.category.as_str())
        .bind(new.unit_price)
        .bind(new.stock)
        .bind(new.available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(&new.sku, e))?;

        let product = row_to_product(&row)?;
        tracing::debug!(id = product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, sku, category, unit_price, stock, available,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, sku, category, unit_price, stock, available,
                   created_at, updated_at
            FROM products
            WHERE sku = $1
            "#,
        )
        .bind(sku.to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, sku, category, unit_price, stock, available,
                   created_at, updated_at
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::boolean IS NULL OR available = $2)
            ORDER BY id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.available)
        .bind(page.skip.max(0))
        .bind(page.limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn count(&self, filter: &ProductFilter) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::boolean IS NULL OR available = $2)
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, name, sku, category, unit_price, stock, available,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(StoreError::NotFound);
        };
        let mut product = row_to_product(&row)?;

        if let Some(sku) = &patch.sku {
            if sku != &product.sku {
                let taken: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND id <> $2)",
                )
                .bind(sku)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

                if taken {
                    return Err(StoreError::DuplicateSku(sku.clone()));
                }
            }
        }

        patch.apply(&mut product);

        let sku_for_err = product.sku.clone();
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, sku = $3, category = $4, unit_price = $5,
                stock = $6, available = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, sku, category, unit_price, stock, available,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.category.as_str())
        .bind(product.unit_price)
        .bind(product.stock)
        .bind(product.available)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(&sku_for_err, e))?;

        let updated = row_to_product(&row)?;
        tx.commit().await?;

        tracing::debug!(id, "product updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id, "product deleted");
        }
        Ok(deleted)
    }

    async fn search_by_name(&self, term: &str, page: Page) -> Result<Vec<Product>, StoreError> {
        let pattern = format!("%{}%", escape_like(term));

        let rows = sqlx::query(
            r#"
            SELECT id, name, sku, category, unit_price, stock, available,
                   created_at, updated_at
            FROM products
            WHERE name ILIKE $1
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(pattern)
        .bind(page.skip.max(0))
        .bind(page.limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_metacharacters() {
        assert_eq!(escape_like("50%_off\\x"), "50\\%\\_off\\\\x");
        assert_eq!(escape_like("pan"), "pan");
    }
}
