//! Crate-standard logging setup.
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `env_filter` accepts anything `EnvFilter` does: a bare level (`info`) or per-target directives
/// (`ot_core=debug,rocket=warn`). Unparseable directives fall back to `info`.
pub fn setup(env_filter: &str) {
    let filter = EnvFilter::try_new(env_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}
