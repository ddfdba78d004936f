//! Log subscriber setup for hosts that do not install their own.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dragzone=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
pub fn init() -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok())
}
