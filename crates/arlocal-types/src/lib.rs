//! Shared types for the arlocal-utils workspace.
//!
//! This crate provides the ledger data model used by both the transport layer
//! and the replication engine:
//!
//! - [`transaction`]: [`Transaction`] as served by an Arweave gateway
//! - [`tag`]: wire tags ([`RawTag`]), decoded tags ([`Tag`]) and the ordered
//!   first-match collection [`Tags`]
//! - [`wallet`]: the opaque signing credential ([`Wallet`])
//! - [`address`]: transaction identifier shape checks
//! - [`encoding`]: base64url helpers matching the ledger's byte encoding

pub mod address;
pub mod encoding;
pub mod env_utils;
pub mod tag;
pub mod transaction;
pub mod wallet;

pub use address::{is_valid_tx_id, TX_ID_LENGTH};
pub use env_utils::{env_string_or, env_var, env_var_or};
pub use tag::{decode_tags, encode_tags, RawTag, Tag, Tags};
pub use transaction::Transaction;
pub use wallet::Wallet;

/// Well-known tag names used by SmartWeave contracts.
pub mod tag_names {
    /// Identifier of the transaction holding the contract source code.
    pub const CONTRACT_SRC: &str = "Contract-Src";
    /// Literal initial state (JSON document).
    pub const INIT_STATE: &str = "Init-State";
    /// Identifier of a transaction whose payload is the initial state.
    pub const INIT_STATE_TX: &str = "Init-State-Tx";
    pub const APP_NAME: &str = "App-Name";
    pub const APP_VERSION: &str = "App-Version";
    pub const CONTENT_TYPE: &str = "Content-Type";
}
