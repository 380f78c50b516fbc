use tracing_subscriber::EnvFilter;

use super::SystemConfig;

/// Install the process-wide subscriber. Call once at startup.
///
/// `RUST_LOG` wins when set; otherwise the configured filter applies.
///
/// ```bash
/// RUST_LOG=debug cargo run
/// ORDER_LOG=order_placement::services=debug cargo run
/// ```
pub fn setup_tracing(config: &SystemConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
