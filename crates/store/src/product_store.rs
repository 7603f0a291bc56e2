use async_trait::async_trait;
use thiserror::Error;

use panaderia_catalog::{Category, NewProduct, Product, ProductPatch};

/// Failures surfaced by [`ProductStore`] implementations.
///
/// `DuplicateSku` and `NotFound` are caller-recoverable conditions the
/// boundary layer maps to failure responses; `Database` is propagated as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another product already holds this (normalized) SKU.
    #[error("SKU {0} already exists")]
    DuplicateSku(String),

    /// No product with the addressed id.
    #[error("product not found")]
    NotFound,

    /// A stored row could not be mapped back into the domain model.
    #[error("row decode failed: {0}")]
    Decode(String),

    /// Internal store state is unusable (e.g. a poisoned lock in the
    /// in-memory implementation).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backing store failure; never recovered at this layer.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Optional filters combined with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub available: Option<bool>,
}

/// Offset pagination window: `skip >= 0`, `limit >= 1` (enforced by the
/// boundary layer; implementations clamp defensively).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// Catalog repository: mediates all reads/writes of products.
///
/// SKU uniqueness is pre-checked before inserts for error-message quality,
/// but the store-level unique constraint is the authoritative guard under
/// concurrent duplicate submissions.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert one record. Fails with [`StoreError::DuplicateSku`] if the
    /// normalized SKU is taken. Returns the stored record with its
    /// system-assigned id and timestamps (`created_at == updated_at`).
    async fn create(&self, new: NewProduct) -> Result<Product, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Case-insensitive exact SKU match (the lookup key is normalized to
    /// uppercase before comparison).
    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Records matching all supplied filters, in stable id order, with
    /// `page.skip` skipped and at most `page.limit` returned.
    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>, StoreError>;

    /// Total matching rows ignoring pagination; same filter semantics as
    /// [`ProductStore::list`].
    async fn count(&self, filter: &ProductFilter) -> Result<i64, StoreError>;

    /// Apply only the patch's present fields. Re-checks SKU uniqueness
    /// (excluding this row) when the patch changes the SKU. Refreshes
    /// `updated_at` on every successful call, even for an empty patch.
    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, StoreError>;

    /// Hard delete. Returns whether a row existed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Case-insensitive substring match on `name`, with the same pagination
    /// semantics as [`ProductStore::list`].
    async fn search_by_name(&self, term: &str, page: Page) -> Result<Vec<Product>, StoreError>;
}
