use std::time::Duration;

use anyhow::Result;
use energy_client::db::usage_queries;
use monitor_service::{
    config::AppConfig,
    metrics_server, observability,
    pipeline::Pipeline,
    sensor::{IioChannel, PowerMeter},
    sinks::UsageSink,
    sources::AdcPowerSource,
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

    let channel = IioChannel::new(&cfg.sensor.device_dir, cfg.sensor.channel)?;
    let meter = PowerMeter::new(channel, &cfg.sensor);

    let source = AdcPowerSource::new(meter, Duration::from_secs(cfg.sensor.sample_interval_secs));
    let sink = UsageSink::new(pool.clone(), cfg.logs.power_log.clone());

    tracing::info!(
        db = %cfg.database.path.display(),
        power_log = %cfg.logs.power_log.display(),
        interval_secs = cfg.sensor.sample_interval_secs,
        "energy monitor sampling started"
    );

    let pipeline = Pipeline { source, sink };
    tokio::select! {
        res = pipeline.run() => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    // Close persistent resources before exit; the sink flushes per cycle.
    pool.close().await;

    Ok(())
}
