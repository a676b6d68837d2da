//! Logging setup.
//!
//! Structured logging via `tracing`. The configured level seeds the default
//! filter; `RUST_LOG` wins when set so operators can raise verbosity per
//! target without a config change.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "redirect_gateway={level},tower_http={level},hyper=warn"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
