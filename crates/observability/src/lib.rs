//! Logging setup shared by applications built on `modelbase`.

/// Initialize process-wide tracing/logging from the environment.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing subscriber configuration (filter, output format).
pub mod tracing;
