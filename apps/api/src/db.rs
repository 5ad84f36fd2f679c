use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the receipts table if it does not exist yet.
/// `id` is a global sequence shared by all owners; every query against this
/// table must be scoped by `owner_id`.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS receipts (
            id            BIGSERIAL PRIMARY KEY,
            file_name     TEXT NOT NULL,
            raw_text      TEXT,
            merchant      TEXT,
            total_amount  DOUBLE PRECISION CHECK (total_amount >= 0),
            purchase_date DATE,
            confidence    DOUBLE PRECISION CHECK (confidence >= 0 AND confidence <= 1),
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
            owner_id      TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS receipts_owner_created_idx ON receipts (owner_id, created_at DESC, id DESC)")
        .execute(pool)
        .await?;

    info!("Receipts schema ready");
    Ok(())
}
