pub mod usage;

pub use usage::UsageSink;
