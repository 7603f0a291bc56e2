use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product category. Closed set; stored as its textual name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bread,
    Pastry,
    Beverages,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Bread,
        Category::Pastry,
        Category::Beverages,
        Category::Other,
    ];

    /// Textual storage representation (matches the `products.category` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bread => "Bread",
            Category::Pastry => "Pastry",
            Category::Beverages => "Beverages",
            Category::Other => "Other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected one of: Bread, Pastry, Beverages, Other)")]
pub struct UnknownCategory(pub String);

impl core::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bread" => Ok(Category::Bread),
            "Pastry" => Ok(Category::Pastry),
            "Beverages" => Ok(Category::Beverages),
            "Other" => Ok(Category::Other),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// One stored catalog record.
///
/// `id`, `created_at` and `updated_at` are system-assigned by the repository;
/// everything else comes in through the validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub unit_price: Decimal,
    pub stock: i64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated, normalized candidate for insertion.
///
/// `sku` is already uppercase here; construction goes through
/// [`crate::validate::validate_create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub unit_price: Decimal,
    pub stock: i64,
    pub available: bool,
}

/// A validated partial update: every field wrapped as present-or-absent.
///
/// Built by [`crate::validate::validate_update`]; absent fields leave the
/// stored value untouched when merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<Category>,
    pub unit_price: Option<Decimal>,
    pub stock: Option<i64>,
    pub available: Option<bool>,
}

impl ProductPatch {
    /// Overlay the present fields onto `product`, leaving the rest untouched.
    ///
    /// Timestamps are the repository's concern and are not modified here.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(unit_price) = self.unit_price {
            product.unit_price = unit_price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(available) = self.available {
            product.available = available;
        }
    }
}
