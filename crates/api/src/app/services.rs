use std::sync::Arc;

use sqlx::PgPool;

use panaderia_store::{InMemoryProductStore, PgProductStore, ProductStore};

/// Handles shared with every request via the router extension.
///
/// The repository is constructed once here and owned by the boundary layer;
/// handlers receive it by reference. No process-wide mutable state.
pub struct AppServices {
    pub products: Arc<dyn ProductStore>,
}

impl AppServices {
    /// Production wiring against a Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            products: Arc::new(PgProductStore::new(pool)),
        }
    }

    /// In-memory wiring for tests and local development without a database.
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryProductStore::new()),
        }
    }
}
