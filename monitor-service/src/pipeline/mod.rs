use std::{pin::Pin, time::SystemTime};

use futures::Stream;

/// A sampled value together with the instant it was taken.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub sampled_at: SystemTime,
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<Envelope<T>, PipelineError>> + Send>>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    async fn run<S>(&self, input: S) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static;
}

/// Wires one source to one sink. There is no transform stage: a sample is
/// already final by the time the source yields it.
///
/// The first error from either side ends the run — a sampler that cannot
/// read its sensor or reach its storage has nothing useful left to do.
pub struct Pipeline<S, K> {
    pub source: S,
    pub sink: K,
}

impl<S, K> Pipeline<S, K> {
    pub async fn run<T>(self) -> Result<(), PipelineError>
    where
        T: Send + 'static,
        S: Source<T> + Send + Sync + 'static,
        K: Sink<T> + Send + Sync + 'static,
    {
        let stream = self.source.stream().await;
        self.sink.run(stream).await
    }
}
