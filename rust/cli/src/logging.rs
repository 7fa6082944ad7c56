//! Diagnostic logging for the CLI.
//!
//! Engine events are emitted through `tracing`; the CLI installs a fmt subscriber
//! writing to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";
/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "info,duel21_engine=debug,duel21_cli=debug";

/// Installs the global subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
