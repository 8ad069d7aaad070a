//! Structured logging initialization

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the tracing subscriber alive until the end of `main`.
pub struct LogGuard {
    pub component: String,
}

/// Initialize structured logging for a component.
///
/// `RUST_LOG` narrows or widens the filter; the default level is INFO.
///
/// # Example
/// ```ignore
/// let _guard = init_logging("mongo-init");
/// info!("Starting up...");
/// ```
pub fn init_logging(component: &str) -> LogGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = fmt::layer().with_target(false);

    // A second init in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();

    tracing::debug!(component, "Logging initialized");

    LogGuard {
        component: component.to_string(),
    }
}
