//! Process-wide tracing setup for binaries and services embedding the engine.

/// Initialize tracing/logging for the process.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
