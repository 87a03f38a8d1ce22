//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the Causeway tracing/logging system.
///
/// Reads the `CAUSEWAY_LOG` environment variable for per-crate log levels.
/// Format: `CAUSEWAY_LOG=causeway_analysis=debug,causeway_storage=warn`
///
/// Falls back to `causeway=info` if `CAUSEWAY_LOG` is not set or is invalid.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("causeway=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init();
    });
}
