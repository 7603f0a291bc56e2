//! Idempotent schema provisioning for the products table.
//!
//! Runs at process startup, before the first request. The
//! `uq_products_sku` unique constraint is the authoritative guard for SKU
//! uniqueness under concurrent inserts.

use sqlx::PgPool;

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id          BIGSERIAL PRIMARY KEY,
            name        VARCHAR(150) NOT NULL,
            sku         VARCHAR(20)  NOT NULL,
            category    VARCHAR(20)  NOT NULL,
            unit_price  NUMERIC(10, 2) NOT NULL,
            stock       BIGINT  NOT NULL DEFAULT 0,
            available   BOOLEAN NOT NULL DEFAULT TRUE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT uq_products_sku UNIQUE (sku)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_products_name ON products (name)")
        .execute(pool)
        .await?;

    tracing::info!("products schema ensured");
    Ok(())
}
