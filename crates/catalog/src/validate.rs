//! Validation layer: field constraints and SKU-format rules applied to
//! inbound payloads before they reach storage.
//!
//! All functions here are pure. Price rules use exact decimal arithmetic
//! (`rust_decimal`), never floats, so boundary values like 1.255 are
//! rejected and 1.25 is accepted reliably.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::{Category, NewProduct, ProductPatch};

pub const NAME_MAX_CHARS: usize = 150;
pub const SKU_MIN_CHARS: usize = 3;
pub const SKU_MAX_CHARS: usize = 20;
const PRICE_MAX_SCALE: u32 = 2;

/// One violated field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation failure enumerating every violated field in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Fields that carry at least one violation.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw create payload: all fields required except `available` (defaults true).
///
/// `category` arrives as text so that an unknown value is reported alongside
/// the other field violations instead of failing JSON decoding outright.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub available: Option<bool>,
}

/// Raw update payload: every field optional; absent fields pass through.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock: Option<i64>,
    pub available: Option<bool>,
}

/// Accumulates per-field violations across all checks of one payload.
#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn capture<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.push(FieldError { field, message });
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors: self.0 })
        }
    }

    fn into_error(self) -> ValidationError {
        ValidationError { errors: self.0 }
    }
}

fn check_name(name: String) -> Result<String, String> {
    let chars = name.chars().count();
    if chars == 0 {
        return Err("must not be empty".to_string());
    }
    if chars > NAME_MAX_CHARS {
        return Err(format!("must be at most {NAME_MAX_CHARS} characters"));
    }
    Ok(name)
}

/// Structural check first (exactly one hyphen separating two non-empty
/// segments), then length, then uppercase normalization.
fn check_sku(sku: &str) -> Result<String, String> {
    let mut segments = sku.split('-');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(head), Some(tail), None) if !head.is_empty() && !tail.is_empty() => {}
        _ => {
            return Err(
                "must be two non-empty segments separated by one hyphen (e.g. PAN-0001)"
                    .to_string(),
            );
        }
    }

    let chars = sku.chars().count();
    if !(SKU_MIN_CHARS..=SKU_MAX_CHARS).contains(&chars) {
        return Err(format!(
            "must be {SKU_MIN_CHARS}-{SKU_MAX_CHARS} characters"
        ));
    }

    Ok(sku.to_uppercase())
}

fn check_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|e| e.to_string())
}

fn check_price(price: Decimal) -> Result<Decimal, String> {
    if price <= Decimal::ZERO {
        return Err("must be greater than 0".to_string());
    }
    if price.scale() > PRICE_MAX_SCALE {
        return Err(format!(
            "must have at most {PRICE_MAX_SCALE} decimal digits"
        ));
    }
    Ok(price)
}

fn check_stock(stock: i64) -> Result<i64, String> {
    if stock < 0 {
        return Err("must not be negative".to_string());
    }
    Ok(stock)
}

/// Validate a create payload; all fields required.
///
/// Runs every check so the error lists all violated fields at once. On
/// success, returns a normalized record (SKU uppercased) ready for the
/// repository.
pub fn validate_create(input: CreateProductInput) -> Result<NewProduct, ValidationError> {
    let mut violations = Violations::default();

    let name = violations.capture("name", check_name(input.name));
    let sku = violations.capture("sku", check_sku(&input.sku));
    let category = violations.capture("category", check_category(&input.category));
    let unit_price = violations.capture("unit_price", check_price(input.unit_price));
    let stock = violations.capture("stock", check_stock(input.stock));

    match (name, sku, category, unit_price, stock) {
        (Some(name), Some(sku), Some(category), Some(unit_price), Some(stock)) => Ok(NewProduct {
            name,
            sku,
            category,
            unit_price,
            stock,
            available: input.available.unwrap_or(true),
        }),
        _ => Err(violations.into_error()),
    }
}

/// Validate an update payload; only supplied fields are checked, with the
/// same per-field rules as create.
pub fn validate_update(input: UpdateProductInput) -> Result<ProductPatch, ValidationError> {
    let mut violations = Violations::default();

    let name = input.name.and_then(|n| violations.capture("name", check_name(n)));
    let sku = input.sku.and_then(|s| violations.capture("sku", check_sku(&s)));
    let category = input
        .category
        .and_then(|c| violations.capture("category", check_category(&c)));
    let unit_price = input
        .unit_price
        .and_then(|p| violations.capture("unit_price", check_price(p)));
    let stock = input.stock.and_then(|s| violations.capture("stock", check_stock(s)));

    violations.finish()?;

    Ok(ProductPatch {
        name,
        sku,
        category,
        unit_price,
        stock,
        available: input.available,
    })
}
