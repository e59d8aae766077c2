//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the level from configuration applies
//! to this crate and to tower-http's request spans.

use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::ObservabilityConfig;

/// Default filter directive for `level`.
pub fn default_directive(level: &str) -> String {
    format!("site_edge={level},tower_http={level}")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
