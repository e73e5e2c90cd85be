use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use energy_client::db::usage_queries;
use monitor_service::{
    api::{self, ApiState},
    config::AppConfig,
    metrics_server, observability,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr);
    }

    let options = SqliteConnectOptions::new()
        .filename(&cfg.database.path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect_with(options)
        .await?;
    usage_queries::ensure_schema(&pool).await?;

    let addr: SocketAddr = cfg
        .api
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid api.bind_addr: {e}"))?;

    let state = ApiState {
        pool: pool.clone(),
        cfg: Arc::new(cfg),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "energy api listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
    })
    .await?;

    pool.close().await;

    Ok(())
}
