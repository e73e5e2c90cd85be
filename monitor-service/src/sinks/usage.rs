use std::path::PathBuf;

use energy_client::{db::usage_queries, Reading};
use futures::StreamExt;
use sqlx::SqlitePool;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    logfmt,
    pipeline::{Envelope, PipelineError, Sink},
};

/// Durable recorder for sampled readings: one `usage` row and one power-log
/// line per envelope, flushed before the next cycle starts.
///
/// No batching and no retry: a failed insert or append ends the run, per
/// the sampler's fatal-error contract.
pub struct UsageSink {
    pool: SqlitePool,
    power_log: PathBuf,
}

impl UsageSink {
    pub fn new(pool: SqlitePool, power_log: PathBuf) -> Self {
        Self { pool, power_log }
    }

    async fn record(
        &self,
        log: &mut tokio::fs::File,
        env: &Envelope<Reading>,
    ) -> Result<(), PipelineError> {
        let reading = &env.payload;

        usage_queries::insert_reading(&self.pool, &reading.timestamp, reading.watts)
            .await
            .map_err(|e| PipelineError::Storage(format!("insert failed: {e}")))?;

        let mut line = logfmt::format_power_line(&reading.timestamp, reading.watts);
        line.push('\n');
        log.write_all(line.as_bytes())
            .await
            .map_err(|e| PipelineError::Storage(format!("power log append failed: {e}")))?;
        log.flush()
            .await
            .map_err(|e| PipelineError::Storage(format!("power log flush failed: {e}")))?;

        metrics::counter!("samples_recorded_total").increment(1);
        if let Ok(latency) = std::time::SystemTime::now().duration_since(env.sampled_at) {
            metrics::histogram!("sample_record_latency_seconds").record(latency.as_secs_f64());
        }
        tracing::debug!(timestamp = %reading.timestamp, watts = reading.watts, "recorded sample");

        Ok(())
    }
}

#[async_trait::async_trait]
impl Sink<Reading> for UsageSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<Reading>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.power_log)
            .await
            .map_err(|e| PipelineError::Storage(format!("failed to open power log: {e}")))?;

        while let Some(item) = input.next().await {
            let env = item?;
            self.record(&mut log, &env).await?;
        }

        // Source ran dry (shutdown): make sure the tail line is on disk.
        let _ = log.flush().await;

        Ok(())
    }
}
