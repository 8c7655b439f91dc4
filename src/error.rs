//! Errors surfaced by the replication engine.
//!
//! Every failure propagates unchanged to the caller. The only recovery in the
//! engine is the best-effort payload fetch for plain transaction copies, which
//! never produces one of these errors.

use std::time::Duration;

use thiserror::Error;

/// Result type for replication operations.
pub type Result<T> = std::result::Result<T, ReplicateError>;

#[derive(Debug, Error)]
pub enum ReplicateError {
    /// Caller-supplied id does not have the 43-character base64url shape.
    #[error("invalid transaction id '{id}': expected 43 characters of [a-zA-Z0-9_-]")]
    InvalidIdentifier { id: String },

    /// The remote ledger does not know the transaction.
    #[error("transaction {id} not found")]
    NotFound { id: String },

    /// A contract transaction lacks (or carries an unusable) required tag.
    #[error("malformed contract {id}: {reason}")]
    MalformedContract { id: String, reason: String },

    /// The credential or ledger client rejected signing.
    #[error("signing failed: {0:#}")]
    Signing(anyhow::Error),

    /// A chunk failed to upload. The transaction's inclusion state is undefined.
    #[error("upload failed at chunk {chunk}: {source:#}")]
    Upload {
        chunk: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A metadata or payload fetch that must not degrade failed.
    #[error("failed to fetch {id}: {source:#}")]
    Fetch {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A payload fetch that must not degrade timed out.
    #[error("fetching {id} timed out after {timeout:?}")]
    Timeout { id: String, timeout: Duration },

    /// A state document (tag or payload) is not valid JSON.
    #[error("invalid state for {id}: {source}")]
    InvalidState {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The state-computation collaborator failed or is not configured.
    #[error("state evaluation failed: {0:#}")]
    StateEvaluation(anyhow::Error),

    /// The caller's state modifier failed.
    #[error("state modifier failed: {0:#}")]
    StateModifier(anyhow::Error),

    /// Wallet generation, transaction creation or the mining trigger failed.
    #[error("ledger error: {0:#}")]
    Ledger(anyhow::Error),

    /// A tag could not be decoded.
    #[error("tag decoding failed: {0:#}")]
    Tag(anyhow::Error),
}

impl ReplicateError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "invalid_identifier",
            Self::NotFound { .. } => "not_found",
            Self::MalformedContract { .. } => "malformed_contract",
            Self::Signing(_) => "signing",
            Self::Upload { .. } => "upload",
            Self::Fetch { .. } => "fetch",
            Self::Timeout { .. } => "timeout",
            Self::InvalidState { .. } => "invalid_state",
            Self::StateEvaluation(_) => "state_evaluation",
            Self::StateModifier(_) => "state_modifier",
            Self::Ledger(_) => "ledger",
            Self::Tag(_) => "tag",
        }
    }

    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedContract {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
