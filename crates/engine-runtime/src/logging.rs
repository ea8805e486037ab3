use tracing_subscriber::{EnvFilter, fmt};

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_level`. Does nothing when a global subscriber is already set.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
