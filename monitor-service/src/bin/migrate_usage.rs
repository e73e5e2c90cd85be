use anyhow::Result;
use energy_client::db::{migrate, usage_queries};
use monitor_service::{config::AppConfig, observability};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// One-shot schema migration: add the appliance columns to the `usage`
/// table. Safe to run any number of times.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let options = SqliteConnectOptions::new()
        .filename(&cfg.database.path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    usage_queries::ensure_schema(&pool).await?;

    let report = migrate::migrate(&pool).await?;

    if report.added_columns.is_empty() {
        tracing::info!("database already up to date");
    } else {
        tracing::info!(added = ?report.added_columns, "migration completed");
    }
    tracing::info!(
        appliance_id = migrate::DEFAULT_APPLIANCE_ID,
        rows = report.default_appliance_rows,
        "default appliance row count"
    );

    pool.close().await;

    Ok(())
}
