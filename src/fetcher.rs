//! Remote transaction fetching.
//!
//! Metadata comes from the remote ledger client; payloads come from the
//! gateway's direct-data endpoint under a bounded wait.
//!
//! Two payload policies:
//! - [`GatewayFetcher::fetch_raw_data`] is best-effort: a timeout or transport
//!   error degrades to the configured placeholder payload. Used for plain
//!   transaction copies, whose payload is not load-bearing.
//! - [`GatewayFetcher::fetch_raw_data_strict`] propagates every failure. Used
//!   for contract source and state payloads.

use std::time::{Duration, Instant};

use arlocal_transport::LedgerReader;
use arlocal_types::{Tags, Transaction};
use tracing::{debug, warn};

use crate::error::{ReplicateError, Result};

/// A remote transaction with its tags decoded.
#[derive(Debug, Clone)]
pub struct FetchedTransaction {
    pub transaction: Transaction,
    pub tags: Tags,
}

/// Reads transactions from the remote ledger.
pub struct GatewayFetcher<'a> {
    remote: &'a dyn LedgerReader,
    timeout: Duration,
    placeholder: &'a [u8],
}

impl<'a> GatewayFetcher<'a> {
    pub fn new(remote: &'a dyn LedgerReader, timeout: Duration, placeholder: &'a [u8]) -> Self {
        Self {
            remote,
            timeout,
            placeholder,
        }
    }

    /// Fetch metadata and decode tags. Fails with `NotFound` when the remote
    /// does not know `id`.
    pub async fn fetch_metadata(&self, id: &str) -> Result<FetchedTransaction> {
        let start = Instant::now();
        let transaction = self
            .remote
            .get_transaction(id)
            .await
            .map_err(|source| ReplicateError::Fetch {
                id: id.to_string(),
                source,
            })?
            .ok_or_else(|| ReplicateError::NotFound { id: id.to_string() })?;
        let tags = transaction.decoded_tags().map_err(ReplicateError::Tag)?;
        debug!(
            id = id,
            tags = tags.len(),
            declared_bytes = transaction.declared_data_size(),
            elapsed_ms = start.elapsed().as_millis(),
            "fetched transaction metadata"
        );
        Ok(FetchedTransaction { transaction, tags })
    }

    /// Fetch the raw payload, degrading to the placeholder on any failure.
    pub async fn fetch_raw_data(&self, id: &str) -> Vec<u8> {
        match tokio::time::timeout(self.timeout, self.remote.get_raw_data(id)).await {
            Ok(Ok(data)) => {
                debug!(id = id, bytes = data.len(), "fetched raw data");
                data
            }
            Ok(Err(e)) => {
                warn!(id = id, error = %e, "raw data fetch failed, using placeholder payload");
                self.placeholder.to_vec()
            }
            Err(_) => {
                warn!(
                    id = id,
                    timeout_ms = self.timeout.as_millis(),
                    "raw data fetch timed out, using placeholder payload"
                );
                self.placeholder.to_vec()
            }
        }
    }

    /// Fetch the raw payload, propagating timeouts and transport errors.
    pub async fn fetch_raw_data_strict(&self, id: &str) -> Result<Vec<u8>> {
        let data = tokio::time::timeout(self.timeout, self.remote.get_raw_data(id))
            .await
            .map_err(|_| ReplicateError::Timeout {
                id: id.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|source| ReplicateError::Fetch {
                id: id.to_string(),
                source,
            })?;
        debug!(id = id, bytes = data.len(), "fetched raw data");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arlocal_transport::test_utils::{fixture_id, TransactionBuilder};
    use arlocal_transport::MemoryLedger;

    const PLACEHOLDER: &[u8] = b"placeholder";

    fn remote_with_tx(id: &str) -> MemoryLedger {
        let remote = MemoryLedger::new();
        remote.seed(
            TransactionBuilder::new(id)
                .tag("A", "1")
                .tag("B", "2")
                .data(b"real payload")
                .build(),
        );
        remote
    }

    #[tokio::test]
    async fn test_fetch_metadata_decodes_tags() {
        let id = fixture_id("tx");
        let remote = remote_with_tx(&id);
        let fetcher = GatewayFetcher::new(&remote, Duration::from_secs(1), PLACEHOLDER);
        let fetched = fetcher.fetch_metadata(&id).await.unwrap();
        assert_eq!(fetched.tags.get("A"), Some("1"));
        assert_eq!(fetched.transaction.id, id);
    }

    #[tokio::test]
    async fn test_fetch_metadata_not_found() {
        let remote = MemoryLedger::new();
        let fetcher = GatewayFetcher::new(&remote, Duration::from_secs(1), PLACEHOLDER);
        let err = fetcher.fetch_metadata(&fixture_id("nope")).await.unwrap_err();
        assert!(matches!(err, ReplicateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_best_effort_degrades_on_error() {
        let id = fixture_id("tx");
        let remote = remote_with_tx(&id);
        remote.set_fail_raw_data(true);
        let fetcher = GatewayFetcher::new(&remote, Duration::from_secs(1), PLACEHOLDER);
        assert_eq!(fetcher.fetch_raw_data(&id).await, PLACEHOLDER);
        assert!(matches!(
            fetcher.fetch_raw_data_strict(&id).await,
            Err(ReplicateError::Fetch { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_effort_degrades_on_timeout() {
        let id = fixture_id("tx");
        let remote = remote_with_tx(&id);
        remote.set_raw_data_delay(Some(Duration::from_secs(60)));
        let fetcher = GatewayFetcher::new(&remote, Duration::from_millis(100), PLACEHOLDER);
        assert_eq!(fetcher.fetch_raw_data(&id).await, PLACEHOLDER);
        assert!(matches!(
            fetcher.fetch_raw_data_strict(&id).await,
            Err(ReplicateError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_real_payload() {
        let id = fixture_id("tx");
        let remote = remote_with_tx(&id);
        let fetcher = GatewayFetcher::new(&remote, Duration::from_secs(1), PLACEHOLDER);
        assert_eq!(fetcher.fetch_raw_data(&id).await, b"real payload");
        assert_eq!(fetcher.fetch_raw_data_strict(&id).await.unwrap(), b"real payload");
    }
}
