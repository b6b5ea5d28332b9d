//! Console logging setup for the binary.
//!
//! Logs go to stderr so stdout stays reserved for run summaries. `RUST_LOG`
//! wins over the verbosity flag when set.

use tracing_subscriber::{fmt, EnvFilter};

/// Map `-v` occurrences to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
  match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: u8) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}
