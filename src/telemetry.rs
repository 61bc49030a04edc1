use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set up structured JSON logging on stdout.
/// The level comes from `RUST_LOG`, defaulting to `info`. Records emitted
/// through the `log` facade are forwarded into the same subscriber.
pub fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    // try_init: a second call (e.g. from tests) is a no-op rather than a panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_telemetry();
        init_telemetry();
        tracing::info!("telemetry initialized twice");
    }
}
