//! Engine configuration.

use std::time::Duration;

use arlocal_types::env_var_or;

/// Payload substituted when a best-effort fetch fails.
pub const PLACEHOLDER_DATA: &[u8] = b"arlocal-utils: payload unavailable";

/// Tunables for a replication engine instance.
#[derive(Debug, Clone)]
pub struct ReplicatorConfig {
    /// Bounded wait for raw payload fetches from the remote gateway.
    pub raw_data_timeout: Duration,
    /// Payload used when a best-effort fetch times out or fails.
    pub placeholder: Vec<u8>,
}

impl ReplicatorConfig {
    pub const DEFAULT_RAW_DATA_TIMEOUT_MS: u64 = 20_000;

    pub fn new(raw_data_timeout_ms: u64) -> Self {
        Self {
            raw_data_timeout: Duration::from_millis(raw_data_timeout_ms),
            placeholder: PLACEHOLDER_DATA.to_vec(),
        }
    }

    /// Read `ARLOCAL_RAW_DATA_TIMEOUT_MS`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::new(env_var_or(
            "ARLOCAL_RAW_DATA_TIMEOUT_MS",
            Self::DEFAULT_RAW_DATA_TIMEOUT_MS,
        ))
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<Vec<u8>>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RAW_DATA_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplicatorConfig::default();
        assert_eq!(config.raw_data_timeout, Duration::from_secs(20));
        assert_eq!(config.placeholder, PLACEHOLDER_DATA);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("ARLOCAL_RAW_DATA_TIMEOUT_MS", "150");
        let config = ReplicatorConfig::from_env();
        assert_eq!(config.raw_data_timeout, Duration::from_millis(150));
        std::env::remove_var("ARLOCAL_RAW_DATA_TIMEOUT_MS");
    }
}
