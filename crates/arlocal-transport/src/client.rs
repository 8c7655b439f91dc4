//! Ledger client abstraction.
//!
//! These traits allow the replication engine to read from and write to
//! different backends (a public gateway over HTTP, a local test node, the
//! in-process [`MemoryLedger`](crate::MemoryLedger)) without coupling it to a
//! specific client implementation.
//!
//! Implementations own their own internal state. Nothing here serializes calls:
//! concurrent copies issued against one client may interleave.

use anyhow::Result;
use arlocal_types::{Transaction, Wallet};
use serde::{Deserialize, Serialize};

/// API endpoint of a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

impl ApiConfig {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            protocol: protocol.into(),
        }
    }

    /// Base URL of the gateway, e.g. `https://arweave.net` or
    /// `http://localhost:1984`. The port is omitted when it is the protocol
    /// default.
    pub fn base_url(&self) -> String {
        let default_port = match self.protocol.as_str() {
            "https" => 443,
            "http" => 80,
            _ => 0,
        };
        if self.port == default_port {
            format!("{}://{}", self.protocol, self.host)
        } else {
            format!("{}://{}:{}", self.protocol, self.host, self.port)
        }
    }
}

/// Read side of a ledger client.
#[async_trait::async_trait]
pub trait LedgerReader: Send + Sync {
    /// Endpoint this client talks to.
    fn config(&self) -> ApiConfig;

    /// Fetch a transaction's metadata. `Ok(None)` means the ledger does not
    /// know the transaction.
    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>>;

    /// Fetch a transaction's raw payload from the direct-data endpoint
    /// (`GET {base_url}/{id}`).
    async fn get_raw_data(&self, id: &str) -> Result<Vec<u8>>;
}

/// Full ledger client: read side plus transaction creation, signing, chunked
/// upload and the block-production trigger.
#[async_trait::async_trait]
pub trait LedgerClient: LedgerReader {
    /// Generate a fresh signing credential.
    async fn generate_wallet(&self) -> Result<Wallet>;

    /// Create an unsigned transaction carrying `data`, owned by `wallet`.
    async fn create_transaction(&self, data: Vec<u8>, wallet: &Wallet) -> Result<Transaction>;

    /// Sign `tx` in place. Fixes `tx.id`.
    async fn sign(&self, tx: &mut Transaction, wallet: &Wallet) -> Result<()>;

    /// Start a chunked upload for a signed transaction.
    ///
    /// Chunk state is tied to this signed instance; an interrupted upload of a
    /// re-signed transaction must start over.
    async fn uploader(&self, tx: &Transaction) -> Result<Box<dyn ChunkUploader>>;

    /// Produce a block containing all pending transactions.
    async fn mine(&self) -> Result<()>;
}

/// Progress of a chunked upload.
#[async_trait::async_trait]
pub trait ChunkUploader: Send {
    /// Whether the ledger has acknowledged every chunk.
    fn is_complete(&self) -> bool;

    /// Number of chunks acknowledged so far.
    fn uploaded_chunks(&self) -> usize;

    /// Total number of chunks for this transaction.
    fn total_chunks(&self) -> usize;

    /// Upload the next chunk.
    async fn upload_chunk(&mut self) -> Result<()>;
}
