use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("monitor_service=info".parse().unwrap_or_else(|_| "info".parse().unwrap()))
        // Per-statement query logging from sqlx is noise at the 5s cadence.
        .add_directive("sqlx=warn".parse().unwrap_or_else(|_| "warn".parse().unwrap()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
