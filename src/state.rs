//! Initial state resolution for contract copies.
//!
//! A contract's initial state comes from exactly one strategy, chosen in this
//! order:
//!
//! 1. [`InitialState::Computed`]: `use_latest_state` was requested. The
//!    current state is computed by replaying the contract's interactions
//!    through a [`StateEvaluator`]. Any state tag is ignored.
//! 2. [`InitialState::Literal`]: the contract carries `Init-State`.
//! 3. [`InitialState::Indirect`]: the contract carries `Init-State-Tx`; the
//!    referenced transaction's payload is the state document.
//! 4. [`InitialState::Absent`]: no state tag. The copy gets no explicit state.
//!
//! An optional [`StateModifier`] then maps the resolved state (possibly
//! absent) to the state used for tag rewriting.

use std::future::Future;

use arlocal_types::tag_names::{INIT_STATE, INIT_STATE_TX};
use arlocal_types::Tags;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::error::{ReplicateError, Result};
use crate::fetcher::GatewayFetcher;
use crate::validation::validate_referenced;

/// State-computation collaborator: replays a contract's interaction history.
#[async_trait::async_trait]
pub trait StateEvaluator: Send + Sync {
    /// Current state of `contract_id` on the remote ledger.
    async fn read_state(&self, contract_id: &str) -> anyhow::Result<Value>;
}

/// Caller hook that replaces the resolved state before tag rewriting.
pub type StateModifier =
    Box<dyn FnOnce(Option<Value>) -> BoxFuture<'static, anyhow::Result<Option<Value>>> + Send>;

/// Box an async closure as a [`StateModifier`].
///
/// ```ignore
/// let modifier = state_modifier(|state| async move {
///     let mut state = state.unwrap_or_default();
///     state["owner"] = "local-wallet".into();
///     Ok(Some(state))
/// });
/// ```
pub fn state_modifier<F, Fut>(f: F) -> StateModifier
where
    F: FnOnce(Option<Value>) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<Option<Value>>> + Send + 'static,
{
    Box::new(move |state| Box::pin(f(state)))
}

/// Where a contract's initial state comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialState {
    /// Parsed `Init-State` tag.
    Literal(Value),
    /// Id of the transaction holding the state, from `Init-State-Tx`.
    Indirect(String),
    /// Replay through the state evaluator.
    Computed,
    /// No state tag.
    Absent,
}

impl InitialState {
    /// Pick the strategy for a contract with `tags`.
    pub fn select(contract_id: &str, tags: &Tags, use_latest: bool) -> Result<Self> {
        if use_latest {
            if tags.contains(INIT_STATE) {
                debug!(
                    contract = contract_id,
                    "computed state overrides the contract's literal Init-State"
                );
            }
            return Ok(Self::Computed);
        }
        if let Some(literal) = tags.get(INIT_STATE) {
            let state =
                serde_json::from_str(literal).map_err(|source| ReplicateError::InvalidState {
                    id: contract_id.to_string(),
                    source,
                })?;
            return Ok(Self::Literal(state));
        }
        if let Some(state_tx) = tags.get(INIT_STATE_TX) {
            validate_referenced(contract_id, INIT_STATE_TX, state_tx)?;
            return Ok(Self::Indirect(state_tx.to_string()));
        }
        Ok(Self::Absent)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Indirect(_) => "indirect",
            Self::Computed => "computed",
            Self::Absent => "absent",
        }
    }
}

/// Options for [`StateResolver::resolve`].
#[derive(Default)]
pub struct ResolveOptions {
    pub use_latest: bool,
    pub state_modifier: Option<StateModifier>,
}

/// Resolves a contract's initial state.
pub struct StateResolver<'a> {
    fetcher: &'a GatewayFetcher<'a>,
    evaluator: Option<&'a dyn StateEvaluator>,
}

impl<'a> StateResolver<'a> {
    pub fn new(fetcher: &'a GatewayFetcher<'a>, evaluator: Option<&'a dyn StateEvaluator>) -> Self {
        Self { fetcher, evaluator }
    }

    /// Resolve the state of `contract_id`, then apply the modifier if any.
    pub async fn resolve(
        &self,
        contract_id: &str,
        tags: &Tags,
        options: ResolveOptions,
    ) -> Result<Option<Value>> {
        let strategy = InitialState::select(contract_id, tags, options.use_latest)?;
        debug!(contract = contract_id, strategy = strategy.name(), "resolving initial state");

        let state = match strategy {
            InitialState::Computed => {
                let evaluator = self.evaluator.ok_or_else(|| {
                    ReplicateError::StateEvaluation(anyhow::anyhow!(
                        "latest state requested but no state evaluator is configured"
                    ))
                })?;
                let state = evaluator
                    .read_state(contract_id)
                    .await
                    .map_err(ReplicateError::StateEvaluation)?;
                Some(state)
            }
            InitialState::Literal(state) => Some(state),
            InitialState::Indirect(state_tx) => {
                let payload = self.fetcher.fetch_raw_data_strict(&state_tx).await?;
                let state = serde_json::from_slice(&payload)
                    .map_err(|source| ReplicateError::InvalidState { id: state_tx, source })?;
                Some(state)
            }
            InitialState::Absent => None,
        };

        match options.state_modifier {
            Some(modifier) => modifier(state).await.map_err(ReplicateError::StateModifier),
            None => Ok(state),
        }
    }
}
