use serde::Deserialize;

use panaderia_catalog::Product;
use panaderia_store::Page;

// Request bodies are the validation layer's raw input types; the handlers
// pass them straight into `validate_create` / `validate_update`.
pub use panaderia_catalog::{
    CreateProductInput as CreateProductRequest, UpdateProductInput as UpdateProductRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination envelope: `page` is derived from the requested window, `size`
/// echoes the requested limit.
pub fn product_list_to_json(items: &[Product], total: i64, page: Page) -> serde_json::Value {
    serde_json::json!({
        "items": items,
        "total": total,
        "page": page.skip / page.limit + 1,
        "size": page.limit,
    })
}
