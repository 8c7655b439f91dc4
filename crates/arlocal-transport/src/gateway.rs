//! Arweave Gateway Client
//!
//! Read-only HTTP access to a public gateway (or a local test node):
//!
//! 1. `GET /tx/{id}` for transaction metadata (tags, declared fields)
//! 2. `GET /{id}` for the raw payload bytes
//!
//! Requests go through a blocking `ureq` agent with request and connect
//! timeouts, driven from async code on the blocking thread pool.
//!
//! # Example
//!
//! ```ignore
//! use arlocal_transport::{GatewayClient, LedgerReader};
//!
//! let client = GatewayClient::from_env()?;
//! if let Some(tx) = client.get_transaction(id).await? {
//!     println!("{} tags", tx.tags.len());
//! }
//! ```

use std::io::Read;
use std::time::Duration;

use anyhow::{anyhow, Result};
use arlocal_types::{env_var_or, Transaction};
use tracing::trace;

use crate::client::{ApiConfig, LedgerReader};
use crate::network::{parse_gateway_url, resolve_gateway_url};

/// HTTP client for an Arweave gateway.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    config: ApiConfig,
    /// Cached `config.base_url()`
    base_url: String,
    agent: ureq::Agent,
}

impl GatewayClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = env_var_or("ARWEAVE_GATEWAY_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = env_var_or(
            "ARWEAVE_GATEWAY_CONNECT_TIMEOUT_SECS",
            Self::DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Client for the public `arweave.net` gateway.
    pub fn arweave() -> Self {
        Self::new(ApiConfig::new("https", "arweave.net", 443))
    }

    /// Client for a custom endpoint with env-configured timeouts.
    pub fn new(config: ApiConfig) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(config, timeout, connect_timeout)
    }

    /// Client with explicit timeouts.
    pub fn with_timeouts(config: ApiConfig, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            base_url: config.base_url(),
            config,
            agent: Self::build_agent(timeout, connect_timeout),
        }
    }

    /// Client for `protocol://host[:port]`.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(parse_gateway_url(url)?))
    }

    /// Client for `ARWEAVE_GATEWAY_URL`, defaulting to `https://arweave.net`.
    pub fn from_env() -> Result<Self> {
        Self::from_url(&resolve_gateway_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tx_url(&self, id: &str) -> String {
        format!("{}/tx/{}", self.base_url, id)
    }

    fn data_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn fetch_transaction_blocking(agent: &ureq::Agent, url: &str) -> Result<Option<Transaction>> {
        let response = match agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(anyhow!("Failed to fetch transaction {}: {}", url, e)),
        };

        // 202 = known to the gateway but still pending
        if response.status() == 202 {
            return Ok(None);
        }

        let tx: Transaction = response
            .into_json()
            .map_err(|e| anyhow!("Failed to parse transaction {}: {}", url, e))?;
        Ok(Some(tx))
    }

    fn fetch_bytes_blocking(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>> {
        let response = agent
            .get(url)
            .call()
            .map_err(|e| anyhow!("Failed to fetch data {}: {}", url, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl LedgerReader for GatewayClient {
    fn config(&self) -> ApiConfig {
        self.config.clone()
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let agent = self.agent.clone();
        let url = self.tx_url(id);
        trace!(url = %url, "fetching transaction metadata");
        tokio::task::spawn_blocking(move || Self::fetch_transaction_blocking(&agent, &url))
            .await
            .map_err(|e| anyhow!("Gateway task failed: {}", e))?
    }

    async fn get_raw_data(&self, id: &str) -> Result<Vec<u8>> {
        let agent = self.agent.clone();
        let url = self.data_url(id);
        trace!(url = %url, "fetching raw data");
        tokio::task::spawn_blocking(move || Self::fetch_bytes_blocking(&agent, &url))
            .await
            .map_err(|e| anyhow!("Gateway task failed: {}", e))?
    }
}
