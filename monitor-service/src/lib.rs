pub mod api;
pub mod config;
pub mod logfmt;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod sensor;
pub mod sinks;
pub mod sources;

pub use pipeline::{Envelope, Pipeline};
