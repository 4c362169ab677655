use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "umls_client=info";

/// Initialize tracing to stderr with an `RUST_LOG`-driven filter.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(target: "system", "Tracing initialized");
    }
    installed
}

/// Log an outbound HTTP call
#[macro_export]
macro_rules! trace_request {
    ($method:expr, $url:expr) => {
        tracing::debug!(target: "http", "{} {}", $method, $url);
    };
}
