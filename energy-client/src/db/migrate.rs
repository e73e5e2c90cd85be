use anyhow::Result;
use sqlx::{Row, SqlitePool};

pub const DEFAULT_APPLIANCE_ID: i64 = 1;
pub const DEFAULT_APPLIANCE_NAME: &str = "Main Appliance";

/// Outcome of one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Columns added by this run; empty when the schema was already current.
    pub added_columns: Vec<String>,
    /// Row count for the default appliance partition after the run.
    pub default_appliance_rows: i64,
}

/// Column names of the `usage` table, in declaration order.
pub async fn table_columns(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("PRAGMA table_info(usage)")
        .fetch_all(pool)
        .await?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        names.push(row.try_get::<String, _>("name")?);
    }
    Ok(names)
}

/// Add the optional appliance columns to the `usage` table.
///
/// Inspects the existing column set first, so running this any number of
/// times leaves the schema in the same state as running it once. Existing
/// rows pick up the column defaults.
pub async fn migrate(pool: &SqlitePool) -> Result<MigrationReport> {
    let columns = table_columns(pool).await?;
    let mut added_columns = Vec::new();

    if !columns.iter().any(|c| c == "appliance_id") {
        sqlx::query("ALTER TABLE usage ADD COLUMN appliance_id INTEGER DEFAULT 1")
            .execute(pool)
            .await?;
        added_columns.push("appliance_id".to_string());
    }

    if !columns.iter().any(|c| c == "appliance_name") {
        sqlx::query("ALTER TABLE usage ADD COLUMN appliance_name TEXT DEFAULT 'Main Appliance'")
            .execute(pool)
            .await?;
        added_columns.push("appliance_name".to_string());
    }

    let row = sqlx::query("SELECT COUNT(*) AS n FROM usage WHERE appliance_id = ?1")
        .bind(DEFAULT_APPLIANCE_ID)
        .fetch_one(pool)
        .await?;
    let default_appliance_rows: i64 = row.try_get("n")?;

    Ok(MigrationReport {
        added_columns,
        default_appliance_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::usage_queries::{ensure_schema, insert_reading};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite pool");
        ensure_schema(&pool).await.expect("schema");
        pool
    }

    #[tokio::test]
    async fn migrate_adds_both_appliance_columns() {
        let pool = test_pool().await;

        let report = migrate(&pool).await.expect("migrate");
        assert_eq!(report.added_columns, vec!["appliance_id", "appliance_name"]);

        let columns = table_columns(&pool).await.expect("columns");
        assert!(columns.iter().any(|c| c == "appliance_id"));
        assert!(columns.iter().any(|c| c == "appliance_name"));
    }

    #[tokio::test]
    async fn migrate_twice_is_idempotent() {
        let pool = test_pool().await;

        migrate(&pool).await.expect("first run");
        let columns_after_first = table_columns(&pool).await.expect("columns");

        let second = migrate(&pool).await.expect("second run");
        assert!(second.added_columns.is_empty());
        assert_eq!(table_columns(&pool).await.expect("columns"), columns_after_first);
    }

    #[tokio::test]
    async fn existing_rows_fall_under_default_appliance() {
        let pool = test_pool().await;
        insert_reading(&pool, "2024-01-15 14:30:25", 43.5).await.expect("insert");
        insert_reading(&pool, "2024-01-15 15:30:25", 50.0).await.expect("insert");

        let report = migrate(&pool).await.expect("migrate");
        assert_eq!(report.default_appliance_rows, 2);
    }
}
