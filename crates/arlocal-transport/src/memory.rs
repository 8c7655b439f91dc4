//! In-process ledger.
//!
//! [`MemoryLedger`] implements the full [`LedgerClient`] contract without a
//! network: wallets, signing, chunked upload and mining all happen in memory.
//! It serves as a local replication target and as the remote/target double in
//! tests, where its call counters ([`MemoryLedger::stats`]) and fault
//! injection switches make failure paths observable.
//!
//! Signing is a stand-in, not Arweave's RSA-PSS scheme: the signature is a
//! SHA-256 digest over the key and the transaction fields, and the id is the
//! base64url SHA-256 of the signature, so ids have the real 43-character shape.
//!
//! A transaction becomes visible to [`LedgerReader::get_transaction`] once its
//! upload completes, and is marked mined by the next [`LedgerClient::mine`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use arlocal_types::encoding::{b64url_decode, b64url_encode};
use arlocal_types::{Transaction, Wallet};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::client::{ApiConfig, ChunkUploader, LedgerClient, LedgerReader};

/// Upper bound of a single uploaded chunk (Arweave's 256 KiB chunk size).
pub const MAX_CHUNK_SIZE: usize = 256 * 1024;

/// Call counters, for asserting how a caller used the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub get_transaction_calls: usize,
    pub get_raw_data_calls: usize,
    pub wallets_generated: usize,
    pub transactions_created: usize,
    pub transactions_signed: usize,
    pub chunks_uploaded: usize,
    pub uploads_completed: usize,
    pub mine_calls: usize,
}

#[derive(Debug, Default)]
struct Inner {
    /// id -> transaction, for everything uploaded or seeded
    transactions: HashMap<String, Transaction>,
    /// ids uploaded but not yet mined, in upload order
    pending: Vec<String>,
    height: u64,
    stats: LedgerStats,
    fail_signing: bool,
    fail_upload_at_chunk: Option<usize>,
    fail_raw_data: bool,
    raw_data_delay: Option<Duration>,
}

/// In-memory ledger implementing [`LedgerClient`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-signed transaction under its own id, as if mined.
    pub fn seed(&self, tx: Transaction) {
        let mut inner = self.inner.lock();
        inner.transactions.insert(tx.id.clone(), tx);
    }

    /// Look up a transaction without touching the call counters.
    pub fn transaction(&self, id: &str) -> Option<Transaction> {
        self.inner.lock().transactions.get(id).cloned()
    }

    /// Whether `id` is stored and not waiting for a block.
    pub fn is_mined(&self, id: &str) -> bool {
        let inner = self.inner.lock();
        inner.transactions.contains_key(id) && !inner.pending.iter().any(|p| p == id)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.inner.lock().transactions.len()
    }

    /// Number of blocks produced by [`LedgerClient::mine`].
    pub fn height(&self) -> u64 {
        self.inner.lock().height
    }

    pub fn stats(&self) -> LedgerStats {
        self.inner.lock().stats.clone()
    }

    /// Make every subsequent `sign` call fail.
    pub fn set_fail_signing(&self, fail: bool) {
        self.inner.lock().fail_signing = fail;
    }

    /// Make uploads fail when they reach chunk index `chunk`.
    pub fn set_fail_upload_at_chunk(&self, chunk: Option<usize>) {
        self.inner.lock().fail_upload_at_chunk = chunk;
    }

    /// Make every subsequent `get_raw_data` call fail.
    pub fn set_fail_raw_data(&self, fail: bool) {
        self.inner.lock().fail_raw_data = fail;
    }

    /// Delay every subsequent `get_raw_data` call.
    pub fn set_raw_data_delay(&self, delay: Option<Duration>) {
        self.inner.lock().raw_data_delay = delay;
    }

    fn signature_digest(secret: &[u8], tx: &Transaction) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        for field in [&tx.owner, &tx.last_tx, &tx.target, &tx.quantity, &tx.data_root] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        for tag in &tx.tags {
            hasher.update(tag.name.as_bytes());
            hasher.update(b"=");
            hasher.update(tag.value.as_bytes());
            hasher.update(b";");
        }
        hasher.finalize().to_vec()
    }
}

fn chunk_count(data_len: usize) -> usize {
    data_len.div_ceil(MAX_CHUNK_SIZE).max(1)
}

#[async_trait::async_trait]
impl LedgerReader for MemoryLedger {
    fn config(&self) -> ApiConfig {
        ApiConfig::new("http", "localhost", 1984)
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let mut inner = self.inner.lock();
        inner.stats.get_transaction_calls += 1;
        Ok(inner.transactions.get(id).cloned())
    }

    async fn get_raw_data(&self, id: &str) -> Result<Vec<u8>> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.stats.get_raw_data_calls += 1;
            inner.raw_data_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.lock();
        if inner.fail_raw_data {
            return Err(anyhow!("Raw data endpoint unavailable"));
        }
        inner
            .transactions
            .get(id)
            .map(|tx| tx.data.clone())
            .ok_or_else(|| anyhow!("No data for transaction {}", id))
    }
}

#[async_trait::async_trait]
impl LedgerClient for MemoryLedger {
    async fn generate_wallet(&self) -> Result<Wallet> {
        let public = Sha256::digest(uuid::Uuid::new_v4().as_bytes());
        let private = Sha256::digest(uuid::Uuid::new_v4().as_bytes());
        self.inner.lock().stats.wallets_generated += 1;
        Ok(Wallet::from_jwk(serde_json::json!({
            "kty": "RSA",
            "e": "AQAB",
            "n": b64url_encode(&public),
            "d": b64url_encode(&private),
        })))
    }

    async fn create_transaction(&self, data: Vec<u8>, wallet: &Wallet) -> Result<Transaction> {
        let owner = wallet
            .owner()
            .ok_or_else(|| anyhow!("Wallet has no public modulus"))?;
        let mut tx = Transaction::new(data, owner);
        tx.last_tx = b64url_encode(&Sha256::digest(uuid::Uuid::new_v4().as_bytes()));
        tx.data_root = b64url_encode(&Sha256::digest(&tx.data));
        self.inner.lock().stats.transactions_created += 1;
        Ok(tx)
    }

    async fn sign(&self, tx: &mut Transaction, wallet: &Wallet) -> Result<()> {
        if self.inner.lock().fail_signing {
            return Err(anyhow!("Signing rejected by ledger"));
        }
        let secret = wallet
            .jwk()
            .get("d")
            .and_then(|d| d.as_str())
            .ok_or_else(|| anyhow!("Wallet has no private key"))?;
        let secret = b64url_decode(secret, "private key")?;
        if wallet.owner() != Some(tx.owner.as_str()) {
            return Err(anyhow!("Wallet does not own this transaction"));
        }

        let signature = Self::signature_digest(&secret, tx);
        tx.id = b64url_encode(&Sha256::digest(&signature));
        tx.signature = b64url_encode(&signature);
        self.inner.lock().stats.transactions_signed += 1;
        Ok(())
    }

    async fn uploader(&self, tx: &Transaction) -> Result<Box<dyn ChunkUploader>> {
        if !tx.is_signed() {
            return Err(anyhow!("Transaction must be signed before upload"));
        }
        Ok(Box::new(MemoryUploader {
            ledger: self.inner.clone(),
            total: chunk_count(tx.data.len()),
            uploaded: 0,
            tx: tx.clone(),
        }))
    }

    async fn mine(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.stats.mine_calls += 1;
        inner.height += 1;
        let mined = std::mem::take(&mut inner.pending);
        trace!(height = inner.height, mined = mined.len(), "mined block");
        Ok(())
    }
}

struct MemoryUploader {
    ledger: Arc<Mutex<Inner>>,
    tx: Transaction,
    total: usize,
    uploaded: usize,
}

#[async_trait::async_trait]
impl ChunkUploader for MemoryUploader {
    fn is_complete(&self) -> bool {
        self.uploaded >= self.total
    }

    fn uploaded_chunks(&self) -> usize {
        self.uploaded
    }

    fn total_chunks(&self) -> usize {
        self.total
    }

    async fn upload_chunk(&mut self) -> Result<()> {
        if self.is_complete() {
            return Err(anyhow!("All {} chunks already uploaded", self.total));
        }

        let mut inner = self.ledger.lock();
        if inner.fail_upload_at_chunk == Some(self.uploaded) {
            return Err(anyhow!(
                "Chunk {} of {} rejected by ledger",
                self.uploaded,
                self.total
            ));
        }

        self.uploaded += 1;
        inner.stats.chunks_uploaded += 1;
        if self.is_complete() {
            inner.stats.uploads_completed += 1;
            inner.pending.push(self.tx.id.clone());
            inner.transactions.insert(self.tx.id.clone(), self.tx.clone());
        }
        Ok(())
    }
}
