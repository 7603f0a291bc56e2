//! In-memory product store.
//!
//! Intended for tests/dev. Mirrors the Postgres implementation's contract,
//! including id assignment, timestamp handling and duplicate-SKU checks.

use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use panaderia_catalog::{NewProduct, Product, ProductPatch};

use crate::product_store::{Page, ProductFilter, ProductStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: Vec<Product>,
}

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn matches(filter: &ProductFilter, product: &Product) -> bool {
    if let Some(category) = filter.category {
        if product.category != category {
            return false;
        }
    }
    if let Some(available) = filter.available {
        if product.available != available {
            return false;
        }
    }
    true
}

fn paginate(items: impl Iterator<Item = Product>, page: Page) -> Vec<Product> {
    items
        .skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.write()?;

        if inner
            .rows
            .iter()
            .any(|p| p.sku.to_uppercase() == new.sku.to_uppercase())
        {
            return Err(StoreError::DuplicateSku(new.sku));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.next_id,
            name: new.name,
            sku: new.sku,
            category: new.category,
            unit_price: new.unit_price,
            stock: new.stock,
            available: new.available,
            created_at: now,
            updated_at: now,
        };

        inner.rows.push(product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let inner = self.read()?;
        Ok(inner.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let needle = sku.to_uppercase();
        let inner = self.read()?;
        Ok(inner
            .rows
            .iter()
            .find(|p| p.sku.to_uppercase() == needle)
            .cloned())
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError> {
        let inner = self.read()?;
        // Rows are kept in insertion (id) order.
        Ok(paginate(
            inner.rows.iter().filter(|p| matches(filter, p)).cloned(),
            page,
        ))
    }

    async fn count(&self, filter: &ProductFilter) -> Result<i64, StoreError> {
        let inner = self.read()?;
        Ok(inner.rows.iter().filter(|p| matches(filter, p)).count() as i64)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut inner = self.write()?;

        let Some(idx) = inner.rows.iter().position(|p| p.id == id) else {
            return Err(StoreError::NotFound);
        };

        if let Some(sku) = &patch.sku {
            let needle = sku.to_uppercase();
            if needle != inner.rows[idx].sku.to_uppercase()
                && inner
                    .rows
                    .iter()
                    .any(|p| p.id != id && p.sku.to_uppercase() == needle)
            {
                return Err(StoreError::DuplicateSku(sku.clone()));
            }
        }

        let product = &mut inner.rows[idx];
        patch.apply(product);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        match inner.rows.iter().position(|p| p.id == id) {
            Some(idx) => {
                inner.rows.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_by_name(&self, term: &str, page: Page) -> Result<Vec<Product>, StoreError> {
        let needle = term.to_lowercase();
        let inner = self.read()?;
        Ok(paginate(
            inner
                .rows
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned(),
            page,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panaderia_catalog::Category;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn new_product(sku: &str, name: &str, category: Category) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            sku: sku.to_string(),
            category,
            unit_price: Decimal::new(125, 2),
            stock: 120,
            available: true,
        }
    }

    fn bread(sku: &str, name: &str) -> NewProduct {
        new_product(sku, name, Category::Bread)
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_equal_timestamps() {
        let store = InMemoryProductStore::new();

        let first = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();
        let second = store.create(bread("PAN-0002", "Baguette")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn create_then_get_by_id_round_trips() {
        let store = InMemoryProductStore::new();
        let created = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        // Idempotent read.
        let again = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(again, fetched);
    }

    #[tokio::test]
    async fn duplicate_sku_rejected_in_any_case_and_first_record_untouched() {
        let store = InMemoryProductStore::new();
        let first = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        let err = store
            .create(bread("pan-0001", "Otro Pan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSku(sku) if sku == "pan-0001"));

        let still_there = store.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(still_there, first);
        assert_eq!(store.count(&ProductFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_by_sku_is_case_insensitive() {
        let store = InMemoryProductStore::new();
        let created = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        let fetched = store.get_by_sku("pan-0001").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);

        assert!(store.get_by_sku("PAN-9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_update_preserves_untouched_fields_and_advances_updated_at() {
        let store = InMemoryProductStore::new();
        let created = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let patch = ProductPatch {
            stock: Some(150),
            ..ProductPatch::default()
        };
        let updated = store.update(created.id, patch).await.unwrap();

        assert_eq!(updated.stock, 150);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.sku, created.sku);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.unit_price, created.unit_price);
        assert_eq!(updated.available, created.available);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn empty_patch_still_refreshes_updated_at() {
        let store = InMemoryProductStore::new();
        let created = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = store
            .update(created.id, ProductPatch::default())
            .await
            .unwrap();
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.stock, created.stock);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let store = InMemoryProductStore::new();
        let err = store.update(999, ProductPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_to_taken_sku_rejected_but_own_sku_allowed() {
        let store = InMemoryProductStore::new();
        let first = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();
        let second = store.create(bread("PAN-0002", "Baguette")).await.unwrap();

        let patch = ProductPatch {
            sku: Some("PAN-0001".to_string()),
            ..ProductPatch::default()
        };
        let err = store.update(second.id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSku(_)));

        // Re-submitting the record's own SKU is not a collision.
        let patch = ProductPatch {
            sku: Some(first.sku.clone()),
            ..ProductPatch::default()
        };
        assert!(store.update(first.id, patch).await.is_ok());
    }

    #[tokio::test]
    async fn delete_then_get_reports_not_found() {
        let store = InMemoryProductStore::new();
        let created = store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        assert!(!store.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_filters_compose_and_count_matches() {
        let store = InMemoryProductStore::new();
        store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();
        store.create(bread("PAN-0002", "Baguette")).await.unwrap();
        store
            .create(new_product("PAS-0101", "Croissant", Category::Pastry))
            .await
            .unwrap();

        let mut unavailable = new_product("PAN-0003", "Pan Integral", Category::Bread);
        unavailable.available = false;
        store.create(unavailable).await.unwrap();

        let filter = ProductFilter {
            category: Some(Category::Bread),
            available: None,
        };
        let breads = store.list(&filter, Page::default()).await.unwrap();
        assert_eq!(breads.len(), 3);
        assert!(breads.iter().all(|p| p.category == Category::Bread));
        assert_eq!(store.count(&filter).await.unwrap(), breads.len() as i64);

        let filter = ProductFilter {
            category: Some(Category::Bread),
            available: Some(true),
        };
        assert_eq!(store.count(&filter).await.unwrap(), 2);

        // No filters means no restriction.
        assert_eq!(store.count(&ProductFilter::default()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn list_paginates_in_stable_id_order() {
        let store = InMemoryProductStore::new();
        for i in 1..=5 {
            store
                .create(bread(&format!("PAN-{i:04}"), &format!("Pan {i}")))
                .await
                .unwrap();
        }

        let page = store
            .list(&ProductFilter::default(), Page { skip: 1, limit: 2 })
            .await
            .unwrap();
        let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let tail = store
            .list(&ProductFilter::default(), Page { skip: 4, limit: 10 })
            .await
            .unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].id, 5);
    }

    #[tokio::test]
    async fn search_matches_substring_case_insensitively() {
        let store = InMemoryProductStore::new();
        store.create(bread("PAN-0001", "Pan Francés")).await.unwrap();
        store.create(bread("PAN-0002", "pan integral")).await.unwrap();
        store
            .create(new_product("PAS-0101", "Croissant", Category::Pastry))
            .await
            .unwrap();

        let hits = store.search_by_name("PAN", Page::default()).await.unwrap();
        assert_eq!(hits.len(), 2);

        let paged = store
            .search_by_name("pan", Page { skip: 1, limit: 1 })
            .await
            .unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name, "pan integral");

        assert!(store
            .search_by_name("donut", Page::default())
            .await
            .unwrap()
            .is_empty());
    }
}
