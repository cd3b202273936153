use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global tracing subscriber
///
/// Honors `RUST_LOG`, defaults to `info`. Safe to call more than once.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = if cfg!(test) {
        fmt::layer().compact().with_test_writer().boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}
