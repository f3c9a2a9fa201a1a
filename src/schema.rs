//! Database schema management for the water-sensor query API.
//!
//! Ensures the `water_data` table and its indexes exist before serving
//! requests. Applied once on startup from `main.rs`.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the database schema (idempotent).
///
/// `timestamp` is stored as TEXT: the service groups and filters on the raw
/// ISO-8601-like string exactly as ingested, and the grouping engine owns
/// temporal interpretation. Safe to call on every startup; no-op if the
/// objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS water_data (
            id          SERIAL PRIMARY KEY,
            "timestamp" TEXT             NOT NULL,
            location    TEXT             NOT NULL,
            water_level DOUBLE PRECISION NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Basic indexes for the date filter and distinct-location count
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_water_data_timestamp
            ON water_data ("timestamp");
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_water_data_location
            ON water_data (location);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
