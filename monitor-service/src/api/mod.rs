//! Read-only HTTP surface over the usage table and the two log files.

pub mod handlers;
pub mod loghistory;
pub mod types;

use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tokio::io::AsyncWriteExt;

use energy_client::domain::timestamp;

use crate::{config::AppConfig, logfmt};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub cfg: Arc<AppConfig>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/energy", get(handlers::current_energy))
        .route("/energy/history", get(handlers::energy_history))
        .route("/logs/energy-monitor", get(handlers::power_log_history))
        .route("/logs/api", get(handlers::api_log_history))
        .route("/logs/summary", get(handlers::logs_summary))
        .route("/logs/historical-data", get(handlers::historical_data))
        .route("/logs/download/energy-monitor", get(handlers::download_power_log))
        .route("/logs/download/api", get(handlers::download_api_log))
        .layer(middleware::from_fn_with_state(state.clone(), access_log))
        .with_state(state)
}

/// Append one access-log line per request. Logging failures never fail the
/// request they describe.
async fn access_log(
    State(state): State<ApiState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    metrics::counter!("api_requests_total").increment(1);

    let line = logfmt::format_api_line(
        &timestamp::format_timestamp(timestamp::local_now()),
        &addr.ip().to_string(),
        &method,
        &path,
        response.status().as_u16(),
    );
    if let Err(e) = append_line(&state.cfg.logs.api_log, &line).await {
        tracing::debug!(error = %e, "failed to append api access log line");
    }

    response
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}
