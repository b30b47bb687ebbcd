//! Diagnostic logging setup.
//!
//! Logs go to stderr only; metascrub never writes a log file.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter (e.g. `metascrub_core=trace`).
pub const LOG_ENV: &str = "METASCRUB_LOG";

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Safe to call once per process.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // Fails only if a subscriber is already installed, which then stays in use.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true, false), "debug");
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(false, false), "warn");
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init(false, false);
        init(true, false);
    }
}
