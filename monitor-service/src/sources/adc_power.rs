use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_stream::try_stream;
use energy_client::{domain::timestamp, Reading};
use futures::Stream;

use crate::{
    pipeline::{Envelope, PipelineError, Source},
    sensor::{AnalogInput, PowerMeter},
};

/// Fixed-cadence power source: one measurement burst per cycle, stamped
/// with the local wall clock, then a fixed sleep.
///
/// The sleep is deliberately not drift-compensated — the cadence contract
/// is "at least `interval` between cycles", not "on the wall-clock grid".
pub struct AdcPowerSource<A> {
    meter: Arc<tokio::sync::Mutex<Option<PowerMeter<A>>>>,
    interval: Duration,
}

impl<A> AdcPowerSource<A> {
    pub fn new(meter: PowerMeter<A>, interval: Duration) -> Self {
        Self {
            meter: Arc::new(tokio::sync::Mutex::new(Some(meter))),
            interval,
        }
    }
}

#[async_trait::async_trait]
impl<A> Source<Reading> for AdcPowerSource<A>
where
    A: AnalogInput + Send + 'static,
{
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<Reading>, PipelineError>> + Send>>
    {
        let mut guard = self.meter.lock().await;
        let mut meter = guard
            .take()
            .expect("AdcPowerSource stream already taken; only one consumer supported");
        let interval = self.interval;

        let s = try_stream! {
            loop {
                // Raw reads are short attribute-file reads; running the burst
                // inline keeps the cycle strictly sequential.
                let watts = meter
                    .sample_watts()
                    .map_err(|e| PipelineError::Sensor(e.to_string()))?;

                let now = timestamp::local_now();
                let reading = Reading {
                    timestamp: timestamp::format_timestamp(now),
                    watts,
                    appliance_id: None,
                    appliance_name: None,
                };

                yield Envelope {
                    payload: reading,
                    sampled_at: SystemTime::now(),
                };

                tokio::time::sleep(interval).await;
            }
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorConfig;
    use crate::sensor::SensorError;
    use futures::StreamExt;

    struct Constant(i32);

    impl AnalogInput for Constant {
        fn read_raw(&mut self) -> Result<i32, SensorError> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl AnalogInput for Broken {
        fn read_raw(&mut self) -> Result<i32, SensorError> {
            Err(SensorError::NotAvailable {
                path: "in_voltage0_raw".to_string(),
            })
        }
    }

    fn meter<A: AnalogInput>(input: A) -> PowerMeter<A> {
        let cfg = SensorConfig {
            full_scale: 1000,
            reference_voltage: 1.0,
            burst_samples: 4,
            ..SensorConfig::default()
        };
        PowerMeter::new(input, &cfg)
    }

    #[tokio::test]
    async fn yields_timestamped_readings() {
        let source = AdcPowerSource::new(meter(Constant(500)), Duration::from_millis(1));
        let mut stream = source.stream().await;

        let env = stream.next().await.expect("item").expect("reading");
        assert!(env.payload.watts > 0.0);
        assert!(
            timestamp::parse_timestamp(&env.payload.timestamp).is_ok(),
            "timestamp {} must use the canonical layout",
            env.payload.timestamp
        );

        let second = stream.next().await.expect("item").expect("reading");
        assert!(second.payload.timestamp >= env.payload.timestamp);
    }

    #[tokio::test]
    async fn sensor_failure_ends_the_stream_with_an_error() {
        let source = AdcPowerSource::new(meter(Broken), Duration::from_millis(1));
        let mut stream = source.stream().await;

        let first = stream.next().await.expect("item");
        assert!(matches!(first, Err(PipelineError::Sensor(_))));
        assert!(stream.next().await.is_none(), "stream must end after the error");
    }
}
