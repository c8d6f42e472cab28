//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use cascade_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter.
pub const LOG_ENV: &str = "CASCADE_LOG";

/// Install the subscriber described by `config`. `CASCADE_LOG` still wins
/// over `log_level` when set. Returns false if a global subscriber already
/// exists.
pub fn init_tracing_from_config(config: &ObservabilityConfig) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    install(filter, config.json)
}

/// Install with the default observability config.
pub fn init_tracing() -> bool {
    init_tracing_from_config(&ObservabilityConfig::default())
}

/// Install with an explicit filter, ignoring `CASCADE_LOG`. Used by tests and
/// embedders that manage their own filtering.
pub fn init_tracing_with_filter(filter: &str) -> bool {
    install(EnvFilter::new(filter), ObservabilityConfig::default().json)
}

fn install(filter: EnvFilter, json: bool) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
