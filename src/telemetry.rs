//! Tracing initialization for the server binary.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// The filter defaults to `info` and honours `RUST_LOG`. Calling this more
/// than once is harmless: later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
