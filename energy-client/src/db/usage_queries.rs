use anyhow::Result;
use sqlx::SqlitePool;

use crate::domain::Reading;

/// Number of rows the history query returns when the caller does not ask
/// for a specific limit.
pub const DEFAULT_HISTORY_LIMIT: u32 = 24;

/// Create the `usage` table if this is a fresh database file.
///
/// The appliance columns are added later by [`crate::db::migrate::migrate`];
/// readers must not assume they exist.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usage (
            timestamp TEXT,
            watts REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append one reading. Rows are never updated or deleted afterwards, and
/// duplicate timestamps are permitted.
pub async fn insert_reading(pool: &SqlitePool, timestamp: &str, watts: f64) -> Result<()> {
    sqlx::query("INSERT INTO usage (timestamp, watts) VALUES (?1, ?2)")
        .bind(timestamp)
        .bind(watts)
        .execute(pool)
        .await?;

    Ok(())
}

/// The single most recent reading, or `None` for an empty table.
pub async fn latest_reading(pool: &SqlitePool) -> Result<Option<Reading>> {
    let row = sqlx::query_as::<_, Reading>(
        "SELECT timestamp, watts FROM usage ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// The most recent `limit` readings, newest first.
pub async fn recent_readings(pool: &SqlitePool, limit: u32) -> Result<Vec<Reading>> {
    let rows = sqlx::query_as::<_, Reading>(
        "SELECT timestamp, watts FROM usage ORDER BY timestamp DESC LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
