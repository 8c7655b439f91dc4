//! Contract-creation collaborator.
//!
//! [`ContractDeployer`] publishes a contract from its source code and initial
//! state, the way SmartWeave's `createContract` does. It backs
//! [`ArLocalUtils::redeploy_contract`](crate::ArLocalUtils::redeploy_contract).

use anyhow::{anyhow, Result};
use arlocal_transport::LedgerClient;
use arlocal_types::tag_names::{APP_NAME, APP_VERSION, CONTENT_TYPE, CONTRACT_SRC, INIT_STATE};
use arlocal_types::{Transaction, Wallet};
use tracing::debug;

/// Publishes a new contract on a ledger.
#[async_trait::async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Publish `source` and a contract initialized with `init_state` (a JSON
    /// document). Returns the new contract's id. Does not mine.
    async fn create_contract(
        &self,
        client: &dyn LedgerClient,
        wallet: &Wallet,
        source: Vec<u8>,
        init_state: String,
    ) -> Result<String>;
}

/// Deployer emitting SmartWeave 0.3 source and contract transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartWeaveDeployer;

impl SmartWeaveDeployer {
    pub const SMARTWEAVE_VERSION: &'static str = "0.3.0";

    async fn post(
        client: &dyn LedgerClient,
        wallet: &Wallet,
        data: Vec<u8>,
        tags: &[(&str, &str)],
    ) -> Result<Transaction> {
        let mut tx = client.create_transaction(data, wallet).await?;
        for (name, value) in tags {
            tx.add_tag(name, value);
        }
        client.sign(&mut tx, wallet).await?;

        let mut uploader = client.uploader(&tx).await?;
        while !uploader.is_complete() {
            let chunk = uploader.uploaded_chunks();
            uploader
                .upload_chunk()
                .await
                .map_err(|e| anyhow!("Failed to upload chunk {} of {}: {}", chunk, tx.id, e))?;
        }
        Ok(tx)
    }
}

#[async_trait::async_trait]
impl ContractDeployer for SmartWeaveDeployer {
    async fn create_contract(
        &self,
        client: &dyn LedgerClient,
        wallet: &Wallet,
        source: Vec<u8>,
        init_state: String,
    ) -> Result<String> {
        let source_tx = Self::post(
            client,
            wallet,
            source,
            &[
                (APP_NAME, "SmartWeaveContractSource"),
                (APP_VERSION, Self::SMARTWEAVE_VERSION),
                (CONTENT_TYPE, "application/javascript"),
            ],
        )
        .await?;

        // the contract payload is never read; keep it unique per deployment
        let nonce = uuid::Uuid::new_v4().to_string().into_bytes();
        let contract_tx = Self::post(
            client,
            wallet,
            nonce,
            &[
                (APP_NAME, "SmartWeaveContract"),
                (APP_VERSION, Self::SMARTWEAVE_VERSION),
                (CONTRACT_SRC, source_tx.id.as_str()),
                (INIT_STATE, init_state.as_str()),
                (CONTENT_TYPE, "text/plain"),
            ],
        )
        .await?;

        debug!(source = %source_tx.id, contract = %contract_tx.id, "deployed contract");
        Ok(contract_tx.id)
    }
}
