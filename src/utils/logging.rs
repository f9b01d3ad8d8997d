//! Logging utilities
//!
//! The library logs through the `log` facade; binaries and tests that want
//! output on stdout/stderr opt in here.

/// Initialize env_logger with an `info` default filter
///
/// Honors `RUST_LOG` when set. Call once per process.
pub fn enable_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
