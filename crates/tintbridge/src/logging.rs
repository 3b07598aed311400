#![forbid(unsafe_code)]

//! Process-wide log output for binaries embedding the bridge.
//!
//! Libraries only emit `tracing` events; installing a subscriber is left to
//! the application. [`init_tracing`] is the one-line default: a `fmt`
//! subscriber filtered by `TINT_LOG` (same syntax as `RUST_LOG`).

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const ENV_LOG_FILTER: &str = "TINT_LOG";

/// Filter used when `TINT_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `fmt` subscriber once.
///
/// Returns `true` if this crate's subscriber is the active global one.
/// Later calls are no-ops returning the first call's result; `false` means
/// another subscriber was already installed.
pub fn init_tracing() -> bool {
    static INSTALLED: OnceLock<bool> = OnceLock::new();
    *INSTALLED.get_or_init(|| {
        let directives = std::env::var(ENV_LOG_FILTER).ok();
        tracing_subscriber::fmt()
            .with_env_filter(filter_from(directives.as_deref()))
            .with_target(true)
            .try_init()
            .is_ok()
    })
}

/// Build a filter from `TINT_LOG`-style directives, falling back to
/// [`DEFAULT_LOG_FILTER`] when absent or unparsable.
#[must_use]
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
