//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    let _ = init_tracing_with(DEFAULT_FILTER);
}

/// Initialize tracing with a fallback filter directive
///
/// `RUST_LOG` still wins when present. Returns `false` when a global
/// subscriber was already installed; the call is then a no-op.
pub fn init_tracing_with(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(fallback, "Tracing initialized");
    }
    installed
}
