//! The replication engine instance.
//!
//! [`ArLocalUtils`] holds a target ledger (`arlocal`), a remote ledger
//! (`arweave`) and one signing credential. The copy operations live in
//! [`crate::tx_copy`], [`crate::contract_copy`] and [`crate::example_psts`].
//!
//! # Concurrency
//!
//! Every operation is a sequence of awaits with no internal parallelism. The
//! instance can be shared (`&self` everywhere), but nothing serializes calls:
//! concurrent copies against one instance sign and upload independently and
//! may race on the target client's own state. Callers that need ordering must
//! serialize their calls.

use std::sync::Arc;

use arlocal_transport::network::is_local_endpoint;
use arlocal_transport::{GatewayClient, LedgerClient, LedgerReader};
use arlocal_types::Wallet;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::ReplicatorConfig;
use crate::error::{ReplicateError, Result};
use crate::fetcher::GatewayFetcher;
use crate::state::StateEvaluator;

/// Replicates transactions and contracts from `arweave` onto `arlocal`.
pub struct ArLocalUtils {
    pub(crate) arlocal: Arc<dyn LedgerClient>,
    pub(crate) arweave: Arc<dyn LedgerReader>,
    wallet: OnceCell<Wallet>,
    pub(crate) config: ReplicatorConfig,
    pub(crate) evaluator: Option<Arc<dyn StateEvaluator>>,
    pub(crate) example_psts: OnceCell<[String; 4]>,
}

impl ArLocalUtils {
    /// Create an engine writing to `arlocal`.
    ///
    /// `arweave` defaults to the gateway named by `ARWEAVE_GATEWAY_URL`, or
    /// `https://arweave.net`. Without a `wallet`, one is generated on the
    /// target ledger the first time a credential is needed.
    pub fn new(
        arlocal: Arc<dyn LedgerClient>,
        arweave: Option<Arc<dyn LedgerReader>>,
        wallet: Option<Wallet>,
    ) -> Self {
        let arweave = arweave.unwrap_or_else(|| {
            let gateway = GatewayClient::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "invalid gateway configuration, using arweave.net");
                GatewayClient::arweave()
            });
            Arc::new(gateway) as Arc<dyn LedgerReader>
        });

        let target = arlocal.config();
        if !is_local_endpoint(&target) {
            warn!(target = %target.base_url(), "replication target is not a local endpoint");
        }
        debug!(
            target = %target.base_url(),
            remote = %arweave.config().base_url(),
            wallet_supplied = wallet.is_some(),
            "created replication engine"
        );

        Self {
            arlocal,
            arweave,
            wallet: OnceCell::new_with(wallet),
            config: ReplicatorConfig::default(),
            evaluator: None,
            example_psts: OnceCell::new(),
        }
    }

    pub fn with_config(mut self, config: ReplicatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Collaborator used when a copy asks for the contract's latest state.
    pub fn with_state_evaluator(mut self, evaluator: Arc<dyn StateEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Target ledger client.
    pub fn arlocal(&self) -> &Arc<dyn LedgerClient> {
        &self.arlocal
    }

    /// Remote ledger client.
    pub fn arweave(&self) -> &Arc<dyn LedgerReader> {
        &self.arweave
    }

    pub fn config(&self) -> &ReplicatorConfig {
        &self.config
    }

    /// The held credential, generating it on the target ledger on first use.
    ///
    /// Generation happens at most once per instance. A failed generation is
    /// not cached; the next call tries again.
    pub async fn ensure_credential(&self) -> Result<&Wallet> {
        self.wallet
            .get_or_try_init(|| async {
                let wallet = self
                    .arlocal
                    .generate_wallet()
                    .await
                    .map_err(ReplicateError::Ledger)?;
                debug!("generated signing credential");
                Ok(wallet)
            })
            .await
    }

    pub(crate) fn fetcher(&self) -> GatewayFetcher<'_> {
        GatewayFetcher::new(
            self.arweave.as_ref(),
            self.config.raw_data_timeout,
            &self.config.placeholder,
        )
    }

    pub(crate) async fn mine(&self) -> Result<()> {
        self.arlocal.mine().await.map_err(ReplicateError::Ledger)?;
        debug!("mined target ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arlocal_transport::MemoryLedger;

    #[tokio::test]
    async fn test_credential_generated_once() {
        let target = MemoryLedger::new();
        let utils = ArLocalUtils::new(
            Arc::new(target.clone()),
            Some(Arc::new(MemoryLedger::new())),
            None,
        );
        let first = utils.ensure_credential().await.unwrap().owner().map(str::to_string);
        let second = utils.ensure_credential().await.unwrap().owner().map(str::to_string);
        assert_eq!(first, second);
        assert_eq!(target.stats().wallets_generated, 1);
    }

    #[tokio::test]
    async fn test_supplied_credential_is_used() {
        let target = MemoryLedger::new();
        let wallet = target.generate_wallet().await.unwrap();
        let owner = wallet.owner().map(str::to_string);
        let utils = ArLocalUtils::new(
            Arc::new(target.clone()),
            Some(Arc::new(MemoryLedger::new())),
            Some(wallet),
        );
        assert_eq!(
            utils.ensure_credential().await.unwrap().owner().map(str::to_string),
            owner
        );
        assert_eq!(target.stats().wallets_generated, 1);
    }

    #[test]
    fn test_accessors() {
        let utils = ArLocalUtils::new(
            Arc::new(MemoryLedger::new()),
            Some(Arc::new(MemoryLedger::new())),
            None,
        )
        .with_config(ReplicatorConfig::new(5));
        assert_eq!(utils.arlocal().config().port, 1984);
        assert_eq!(utils.arweave().config().host, "localhost");
        assert_eq!(utils.config().raw_data_timeout.as_millis(), 5);
    }
}
