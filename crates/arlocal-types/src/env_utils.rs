//! Environment variable parsing utilities.
//!
//! Configuration in this workspace is read from the environment. These helpers
//! replace the repeated pattern:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! # Example
//!
//! ```
//! use arlocal_types::env_utils::{env_var, env_var_or};
//!
//! let timeout: u64 = env_var_or("ARLOCAL_RAW_DATA_TIMEOUT_MS", 20_000);
//! let custom: Option<u64> = env_var("CUSTOM_VALUE");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
///
/// ```
/// use arlocal_types::env_utils::env_var_or;
///
/// let secs: u64 = env_var_or("ARWEAVE_GATEWAY_TIMEOUT_SECS", 30);
/// ```
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Get an environment variable as a string, falling back to `default` when it
/// is unset or blank.
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("ARLOCAL_TEST_U64", "42");
        let val: Option<u64> = env_var("ARLOCAL_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("ARLOCAL_NONEXISTENT_VAR_1");
        assert_eq!(missing, None);

        std::env::remove_var("ARLOCAL_TEST_U64");
    }

    #[test]
    fn test_env_var_or() {
        std::env::set_var("ARLOCAL_TEST_WITH_DEFAULT", "not-a-number");
        let val: u64 = env_var_or("ARLOCAL_TEST_WITH_DEFAULT", 50);
        assert_eq!(val, 50);

        let default_val: u64 = env_var_or("ARLOCAL_NONEXISTENT_VAR_2", 7);
        assert_eq!(default_val, 7);

        std::env::remove_var("ARLOCAL_TEST_WITH_DEFAULT");
    }

    #[test]
    fn test_env_string_or_ignores_blank() {
        std::env::set_var("ARLOCAL_TEST_BLANK", "   ");
        assert_eq!(env_string_or("ARLOCAL_TEST_BLANK", "fallback"), "fallback");
        std::env::set_var("ARLOCAL_TEST_BLANK", "http://localhost:1984");
        assert_eq!(
            env_string_or("ARLOCAL_TEST_BLANK", "fallback"),
            "http://localhost:1984"
        );
        std::env::remove_var("ARLOCAL_TEST_BLANK");
    }
}
