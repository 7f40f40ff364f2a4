//! Environment variable parsing utilities.
//!
//! Every tunable of the explorer (scan bounds, staleness window, endpoints)
//! can be overridden from the environment; these helpers keep the parsing
//! uniform and silent about unparsable values (they fall back to the default).
//!
//! # Example
//!
//! ```
//! use sui_explorer_types::env_utils::{env_var, env_var_or};
//!
//! let max_pages: usize = env_var_or("SUI_EXPLORER_CATALOG_MAX_PAGES", 300);
//! let custom: Option<u64> = env_var("SUI_EXPLORER_STALE_SECS");
//! ```

use std::str::FromStr;
use std::time::Duration;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Non-empty string value of an environment variable.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Duration in whole seconds, with a default.
pub fn env_secs_or(key: &str, default: Duration) -> Duration {
    env_var::<u64>(key)
        .map(Duration::from_secs)
        .unwrap_or(default)
}
