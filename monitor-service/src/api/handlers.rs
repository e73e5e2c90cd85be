use std::path::Path;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use time::PrimitiveDateTime;
use tokio_util::io::ReaderStream;

use energy_client::{db::usage_queries, domain::timestamp};

use super::{loghistory, types::*, ApiState};
use crate::logfmt;

const NO_DATA: &str = "No data available";

const ENDPOINTS: &[&str] = &[
    "/",
    "/health",
    "/energy",
    "/energy/history",
    "/logs/energy-monitor",
    "/logs/api",
    "/logs/summary",
    "/logs/historical-data",
    "/logs/download/energy-monitor",
    "/logs/download/api",
];

/// Data-layer failures deliberately ship as HTTP 200 with an error body;
/// the download endpoints are the only place real status codes appear.
fn data_error(context: &str, err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, context, "request failed");
    metrics::counter!("api_data_errors_total").increment(1);
    Json(ErrorBody {
        error: format!("{context}: {err}"),
    })
    .into_response()
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "energy-monitor",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

/// Existence checks only; this endpoint reports status flags and never
/// returns an error itself.
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: state.cfg.database.path.exists(),
        energy_monitor_log: state.cfg.logs.power_log.exists(),
        api_log: state.cfg.logs.api_log.exists(),
        timestamp: timestamp::format_timestamp(timestamp::local_now()),
    })
}

pub async fn current_energy(State(state): State<ApiState>) -> Response {
    match usage_queries::latest_reading(&state.pool).await {
        Ok(Some(reading)) => Json(reading).into_response(),
        Ok(None) => Json(ErrorBody {
            error: NO_DATA.to_string(),
        })
        .into_response(),
        Err(e) => data_error("failed to query latest reading", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

pub async fn energy_history(
    State(state): State<ApiState>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let limit = params.limit.unwrap_or(state.cfg.api.history_limit);
    match usage_queries::recent_readings(&state.pool, limit).await {
        Ok(data) => Json(HistoryResponse {
            count: data.len(),
            data,
        })
        .into_response(),
        Err(e) => data_error("failed to query history", e),
    }
}

pub async fn power_log_history(State(state): State<ApiState>) -> Response {
    match tokio::fs::read_to_string(&state.cfg.logs.power_log).await {
        Ok(text) => {
            let data = loghistory::parse_power_log(&text);
            Json(PowerLogResponse {
                count: data.len(),
                file_size: text.len() as u64,
                data,
            })
            .into_response()
        }
        Err(e) => data_error("failed to read power log", e),
    }
}

pub async fn api_log_history(State(state): State<ApiState>) -> Response {
    match tokio::fs::read_to_string(&state.cfg.logs.api_log).await {
        Ok(text) => {
            let data = loghistory::parse_api_log(&text);
            Json(ApiLogResponse {
                count: data.len(),
                file_size: text.len() as u64,
                data,
            })
            .into_response()
        }
        Err(e) => data_error("failed to read api log", e),
    }
}

/// Each file is re-scanned independently; a missing file is an
/// `exists: false` summary, not an error.
pub async fn logs_summary(State(state): State<ApiState>) -> Json<LogsSummaryResponse> {
    let energy_monitor = summarize(&state.cfg.logs.power_log, |text| {
        loghistory::parse_power_log(text).len()
    })
    .await;
    let api = summarize(&state.cfg.logs.api_log, |text| {
        loghistory::parse_api_log(text).len()
    })
    .await;

    Json(LogsSummaryResponse { energy_monitor, api })
}

async fn summarize(path: &Path, records_in: impl Fn(&str) -> usize) -> LogFileSummary {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => LogFileSummary {
            exists: true,
            size_bytes: text.len() as u64,
            records: records_in(&text),
        },
        Err(_) => LogFileSummary {
            exists: false,
            size_bytes: 0,
            records: 0,
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoricalParams {
    pub days: Option<i64>,
}

pub async fn historical_data(
    State(state): State<ApiState>,
    Query(params): Query<HistoricalParams>,
) -> Response {
    let days = params.days.unwrap_or(7);
    let now = timestamp::local_now();
    let cutoff = PrimitiveDateTime::new(now.date(), now.time()) - time::Duration::days(days);

    match tokio::fs::read_to_string(&state.cfg.logs.power_log).await {
        Ok(text) => {
            let entries = loghistory::parse_power_log(&text);
            let data = loghistory::filter_since(entries, cutoff);
            let daily_stats = loghistory::daily_stats(&data);
            Json(HistoricalDataResponse {
                days,
                count: data.len(),
                data,
                daily_stats,
            })
            .into_response()
        }
        Err(e) => data_error("failed to read power log", e),
    }
}

pub async fn download_power_log(State(state): State<ApiState>) -> Result<Response, StatusCode> {
    serve_file(&state.cfg.logs.power_log, logfmt::POWER_LOG_FILE).await
}

pub async fn download_api_log(State(state): State<ApiState>) -> Result<Response, StatusCode> {
    serve_file(&state.cfg.logs.api_log, logfmt::API_LOG_FILE).await
}

/// Stream the raw file bytes. A missing file is a real 404 — never a
/// success with an empty body.
async fn serve_file(path: &Path, filename: &str) -> Result<Response, StatusCode> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let body = axum::body::Body::from_stream(ReaderStream::new(file));
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, body).into_response())
}
