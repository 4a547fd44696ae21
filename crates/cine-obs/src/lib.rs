use cine_config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging for a process.
/// - RUST_LOG wins over `default_filter`
/// - JSON lines for collectors, or human-readable output on a terminal
///
/// Calling it again once a subscriber is installed only logs a warning.
pub fn init(service_name: &str, format: LogFormat, default_filter: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(fmt_layer)
        .try_init();

    match installed {
        Ok(()) => tracing::info!(service = %service_name, ?format, "Logging initialized"),
        Err(e) => tracing::warn!(service = %service_name, "Logging already initialized: {}", e),
    }
}
