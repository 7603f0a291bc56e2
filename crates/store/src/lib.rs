//! Storage layer: catalog repository over a relational store.
//!
//! The repository contract lives in [`product_store`]; [`postgres`] is the
//! production implementation and [`in_memory`] backs tests and local dev
//! without a database.

pub mod in_memory;
pub mod postgres;
pub mod product_store;
pub mod schema;

pub use in_memory::InMemoryProductStore;
pub use postgres::PgProductStore;
pub use product_store::{Page, ProductFilter, ProductStore, StoreError};
