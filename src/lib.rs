//! ArLocal Utils
//!
//! Replicates Arweave transactions and SmartWeave contracts from a remote
//! gateway onto a local ledger, so integration tests can run against real
//! contracts without touching mainnet:
//!
//! - **Transaction copies**: [`ArLocalUtils::copy_transaction`] republishes a
//!   transaction's payload and tags under the local credential
//! - **Contract copies**: [`ArLocalUtils::copy_contract`] copies a contract's
//!   source transaction and contract transaction, rewriting `Contract-Src` and
//!   the initial-state tags so the copy stays self-consistent
//! - **Example contracts**: [`ArLocalUtils::example_psts`] copies four
//!   well-known PST contracts once per instance
//!
//! The ledger clients live in [`arlocal_transport`]; the data model lives in
//! [`arlocal_types`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use arlocal_transport::MemoryLedger;
//! use arlocal_utils::ArLocalUtils;
//!
//! let utils = ArLocalUtils::new(Arc::new(MemoryLedger::new()), None, None);
//! let id = utils.copy_transaction("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw").await?;
//! ```

#![allow(clippy::result_large_err)]

pub mod config;
pub mod contract_copy;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod example_psts;
pub mod fetcher;
pub mod rewrite;
pub mod state;
pub mod tx_copy;
pub mod upload;
pub mod validation;

pub use config::{ReplicatorConfig, PLACEHOLDER_DATA};
pub use contract_copy::Stage;
pub use deploy::{ContractDeployer, SmartWeaveDeployer};
pub use engine::ArLocalUtils;
pub use error::{ReplicateError, Result};
pub use example_psts::EXAMPLE_PST_CONTRACTS;
pub use fetcher::{FetchedTransaction, GatewayFetcher};
pub use rewrite::rewrite_contract_tags;
pub use state::{state_modifier, InitialState, ResolveOptions, StateEvaluator, StateModifier, StateResolver};
pub use upload::ChunkUpload;
pub use validation::validate;
