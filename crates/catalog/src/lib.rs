//! Catalog domain module.
//!
//! Business rules for the bakery product catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod validate;

pub use product::{Category, NewProduct, Product, ProductPatch, UnknownCategory};
pub use validate::{
    CreateProductInput, FieldError, UpdateProductInput, ValidationError, validate_create,
    validate_update,
};
