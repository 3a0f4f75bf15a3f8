//! # Logging Setup
//!
//! Binaries call [`init`] once; libraries only emit through `tracing`.

use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` for
/// the workspace crates when `verbose` is on.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "info,starfield=debug,starfield_core=debug,starfield_procedural=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
