//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with command output or the TUI's
//! alternate screen. Verbosity comes from `FOLIO_LOG` (an `EnvFilter`
//! directive such as `folio=debug`), defaulting to `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FOLIO_LOG";

/// Install the global subscriber. Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
