//! Contract copies.
//!
//! A contract is a transaction carrying a `Contract-Src` tag. Copying one
//! copies the referenced source transaction first, then publishes a new
//! contract transaction whose tags point at the local source copy and carry
//! the resolved initial state. Both uploads are mined in one block.
//!
//! Nothing is rolled back: a failure after the source copy is uploaded leaves
//! that copy orphaned on the target ledger.

use std::fmt;
use std::time::Instant;

use arlocal_types::encode_tags;
use arlocal_types::tag_names::CONTRACT_SRC;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::deploy::ContractDeployer;
use crate::engine::ArLocalUtils;
use crate::error::{ReplicateError, Result};
use crate::fetcher::FetchedTransaction;
use crate::rewrite::rewrite_contract_tags;
use crate::state::{ResolveOptions, StateModifier, StateResolver};
use crate::upload::ChunkUpload;
use crate::validation::{validate, validate_referenced};

/// Progress of a contract copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    FetchingContract,
    FetchingSource,
    ResolvingState,
    ReplicatingSource,
    BuildingContractTx,
    Signing,
    Uploading,
    Mining,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::FetchingContract => "fetching_contract",
            Self::FetchingSource => "fetching_source",
            Self::ResolvingState => "resolving_state",
            Self::ReplicatingSource => "replicating_source",
            Self::BuildingContractTx => "building_contract_tx",
            Self::Signing => "signing",
            Self::Uploading => "uploading",
            Self::Mining => "mining",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage and logs transitions.
struct StageTracker<'a> {
    contract: &'a str,
    stage: Stage,
}

impl<'a> StageTracker<'a> {
    fn new(contract: &'a str) -> Self {
        debug!(contract = contract, stage = %Stage::Validating, "contract copy stage");
        Self {
            contract,
            stage: Stage::Validating,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!(contract = self.contract, from = %self.stage, stage = %stage, "contract copy stage");
        self.stage = stage;
    }

    fn fail(&mut self, err: ReplicateError) -> ReplicateError {
        warn!(
            contract = self.contract,
            stage = %self.stage,
            kind = err.kind(),
            error = %err,
            "contract copy failed"
        );
        self.stage = Stage::Failed;
        err
    }
}

/// Source transaction of a contract with its payload.
struct ContractSource {
    fetched: FetchedTransaction,
    code: Vec<u8>,
}

impl ArLocalUtils {
    /// Copy contract `id` and its source transaction onto the target ledger.
    /// Returns the new contract transaction's id.
    ///
    /// With `use_latest_state`, the initial state of the copy is the
    /// contract's current state computed by the configured
    /// [`StateEvaluator`](crate::StateEvaluator), overriding any literal
    /// `Init-State`. `state_modifier` sees the resolved state (possibly
    /// `None`) and its result is what the copy carries.
    pub async fn copy_contract(
        &self,
        id: &str,
        use_latest_state: bool,
        state_modifier: Option<StateModifier>,
    ) -> Result<String> {
        let start = Instant::now();
        let mut tracker = StageTracker::new(id);
        let result = self
            .copy_contract_stages(id, use_latest_state, state_modifier, &mut tracker)
            .await;
        match result {
            Ok(new_id) => {
                tracker.enter(Stage::Done);
                info!(
                    contract = id,
                    new_id = %new_id,
                    elapsed_ms = start.elapsed().as_millis(),
                    "copied contract"
                );
                Ok(new_id)
            }
            Err(e) => Err(tracker.fail(e)),
        }
    }

    async fn copy_contract_stages(
        &self,
        id: &str,
        use_latest_state: bool,
        state_modifier: Option<StateModifier>,
        tracker: &mut StageTracker<'_>,
    ) -> Result<String> {
        validate(id)?;
        let fetcher = self.fetcher();

        tracker.enter(Stage::FetchingContract);
        let contract = fetcher.fetch_metadata(id).await?;
        let source_id = contract
            .tags
            .get(CONTRACT_SRC)
            .ok_or_else(|| ReplicateError::malformed(id, "missing Contract-Src tag"))?
            .to_string();
        validate_referenced(id, CONTRACT_SRC, &source_id)?;

        tracker.enter(Stage::FetchingSource);
        let source = self.fetch_source(&source_id).await?;

        tracker.enter(Stage::ResolvingState);
        let state = self
            .resolve_state(id, &contract, use_latest_state, state_modifier)
            .await?;

        tracker.enter(Stage::ReplicatingSource);
        let new_source_id = self
            .publish(
                source.code,
                &source.fetched.tags,
                &source.fetched.transaction.target,
            )
            .await?;
        debug!(contract = id, source = %source_id, new_source = %new_source_id, "copied contract source");

        tracker.enter(Stage::BuildingContractTx);
        let data = fetcher.fetch_raw_data(id).await;
        let tags = rewrite_contract_tags(
            &contract.tags,
            &new_source_id,
            state.as_ref(),
            use_latest_state,
        );
        let wallet = self.ensure_credential().await?;
        let mut tx = self
            .arlocal
            .create_transaction(data, wallet)
            .await
            .map_err(ReplicateError::Ledger)?;
        tx.tags.extend(encode_tags(&tags));
        tx.target = contract.transaction.target.clone();

        tracker.enter(Stage::Signing);
        self.arlocal
            .sign(&mut tx, wallet)
            .await
            .map_err(ReplicateError::Signing)?;

        tracker.enter(Stage::Uploading);
        let uploader = self
            .arlocal
            .uploader(&tx)
            .await
            .map_err(|source| ReplicateError::Upload { chunk: 0, source })?;
        ChunkUpload::new(tx.id.clone(), uploader)
            .run_to_completion()
            .await?;

        tracker.enter(Stage::Mining);
        self.mine().await?;
        Ok(tx.id)
    }

    /// Copy contract `id` through a contract-creation collaborator instead of
    /// replaying its transactions: the deployer publishes the source code and
    /// the resolved initial state as a brand-new contract.
    ///
    /// Fails with `MalformedContract` when no initial state can be resolved.
    pub async fn redeploy_contract(
        &self,
        id: &str,
        use_latest_state: bool,
        state_modifier: Option<StateModifier>,
        deployer: &dyn ContractDeployer,
    ) -> Result<String> {
        validate(id)?;
        let start = Instant::now();

        let contract = self.fetcher().fetch_metadata(id).await?;
        let source_id = contract
            .tags
            .get(CONTRACT_SRC)
            .ok_or_else(|| ReplicateError::malformed(id, "missing Contract-Src tag"))?
            .to_string();
        validate_referenced(id, CONTRACT_SRC, &source_id)?;
        let source = self.fetch_source(&source_id).await?;

        let state = self
            .resolve_state(id, &contract, use_latest_state, state_modifier)
            .await?
            .ok_or_else(|| ReplicateError::malformed(id, "no initial state to deploy with"))?;

        let wallet = self.ensure_credential().await?;
        let new_id = deployer
            .create_contract(self.arlocal.as_ref(), wallet, source.code, state.to_string())
            .await
            .map_err(ReplicateError::Ledger)?;
        self.mine().await?;

        info!(
            contract = id,
            new_id = %new_id,
            elapsed_ms = start.elapsed().as_millis(),
            "redeployed contract"
        );
        Ok(new_id)
    }

    async fn fetch_source(&self, source_id: &str) -> Result<ContractSource> {
        let fetcher = self.fetcher();
        let fetched = fetcher.fetch_metadata(source_id).await?;
        let code = fetcher.fetch_raw_data_strict(source_id).await?;
        Ok(ContractSource { fetched, code })
    }

    async fn resolve_state(
        &self,
        id: &str,
        contract: &FetchedTransaction,
        use_latest: bool,
        state_modifier: Option<StateModifier>,
    ) -> Result<Option<Value>> {
        let fetcher = self.fetcher();
        StateResolver::new(&fetcher, self.evaluator.as_deref())
            .resolve(
                id,
                &contract.tags,
                ResolveOptions {
                    use_latest,
                    state_modifier,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arlocal_transport::test_utils::{fixture_id, TransactionBuilder};
    use arlocal_transport::{MemoryLedger, MAX_CHUNK_SIZE};
    use arlocal_types::tag_names::{INIT_STATE, INIT_STATE_TX};

    use super::*;

    fn engine(remote: &MemoryLedger, target: &MemoryLedger) -> ArLocalUtils {
        ArLocalUtils::new(
            Arc::new(target.clone()),
            Some(Arc::new(remote.clone())),
            None,
        )
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::BuildingContractTx.to_string(), "building_contract_tx");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }

    #[tokio::test]
    async fn test_missing_source_tag_is_malformed() {
        let (remote, target) = (MemoryLedger::new(), MemoryLedger::new());
        let id = fixture_id("not-a-contract");
        remote.seed(TransactionBuilder::new(&id).tag("App-Name", "x").build());

        let err = engine(&remote, &target)
            .copy_contract(&id, false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReplicateError::MalformedContract { .. }));
        assert_eq!(target.stats().transactions_created, 0);
    }

    #[tokio::test]
    async fn test_missing_source_payload_is_fatal() {
        let (remote, target) = (MemoryLedger::new(), MemoryLedger::new());
        let (id, src) = (fixture_id("contract"), fixture_id("src"));
        remote.seed(TransactionBuilder::new(&src).data(b"export function handle() {}").build());
        remote.seed(
            TransactionBuilder::new(&id)
                .tag(CONTRACT_SRC, &src)
                .tag(INIT_STATE, "{}")
                .build(),
        );
        remote.set_fail_raw_data(true);

        let err = engine(&remote, &target)
            .copy_contract(&id, false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReplicateError::Fetch { .. }));
        assert_eq!(target.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_contract_upload_failure_leaves_source_copy() {
        let (remote, target) = (MemoryLedger::new(), MemoryLedger::new());
        let (id, src, state) = (fixture_id("contract"), fixture_id("src"), fixture_id("state"));
        remote.seed(TransactionBuilder::new(&src).data(b"code").build());
        remote.seed(TransactionBuilder::new(&state).data(br#"{"n":1}"#).build());
        remote.seed(
            TransactionBuilder::new(&id)
                .tag(CONTRACT_SRC, &src)
                .tag(INIT_STATE_TX, &state)
                .data(&vec![0u8; MAX_CHUNK_SIZE + 1])
                .build(),
        );
        let utils = engine(&remote, &target);

        // the one-chunk source upload passes, the two-chunk contract upload does not
        target.set_fail_upload_at_chunk(Some(1));
        let err = utils.copy_contract(&id, false, None).await.unwrap_err();
        assert!(matches!(err, ReplicateError::Upload { chunk: 1, .. }));
        assert_eq!(target.transaction_count(), 1);
        assert_eq!(target.stats().mine_calls, 0);

        target.set_fail_upload_at_chunk(None);
        let new_id = utils.copy_contract(&id, false, None).await.unwrap();
        let copy = target.transaction(&new_id).unwrap().decoded_tags().unwrap();
        assert_eq!(copy.get(INIT_STATE), Some(r#"{"n":1}"#));
        assert!(!copy.contains(INIT_STATE_TX));
        assert_eq!(target.transaction_count(), 3);
    }
}
