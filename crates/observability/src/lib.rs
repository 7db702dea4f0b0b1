//! Logging setup shared by every binary in the workspace.

pub mod tracing;

pub use tracing::LogFormat;

/// Initialize process-wide tracing, reading `LOG_FORMAT` and `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    tracing::init(format);
}
