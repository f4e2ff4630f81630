use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging.
///
/// - **Log Level**: `LOG_LEVEL` environment variable (default: "info"),
///   overridden entirely by `RUST_LOG` when set
/// - **Filtering**: sqlx noise capped at warn
/// - **Format**: compact, with file and line
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("campus={log_level},campus_cli={log_level},sqlx=warn"))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // try_init: tests and embedders may already have a subscriber installed
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
