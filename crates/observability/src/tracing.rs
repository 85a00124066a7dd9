//! Tracing/logging initialization.
//!
//! Domain crates only emit `tracing` events; the embedding process decides where
//! they go by calling [`init`] or [`init_with_filter`] once at startup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize JSON tracing, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Initialize JSON tracing with an explicit filter directive
/// (e.g. `"stockledger_inventory=debug"`), ignoring `RUST_LOG`.
///
/// Returns `false` if the directive is invalid or a subscriber is already set.
pub fn init_with_filter(directive: &str) -> bool {
    match EnvFilter::try_new(directive) {
        Ok(filter) => install(filter),
        Err(_) => false,
    }
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        assert!(!init_with_filter("stockledger_inventory=debug"));
    }

    #[test]
    fn invalid_directive_is_refused() {
        assert!(!init_with_filter("stockledger=loud"));
    }
}
