//! Chunked upload driver.
//!
//! [`ChunkUpload`] walks a signed transaction's chunks one at a time. Each
//! [`ChunkUpload::next`] call uploads one chunk and yields its index, so a
//! caller can observe progress or stop between chunks. Once the ledger reports
//! completion the driver yields `None`.

use std::time::Instant;

use arlocal_transport::ChunkUploader;
use tracing::debug;

use crate::error::{ReplicateError, Result};

pub struct ChunkUpload {
    tx_id: String,
    uploader: Box<dyn ChunkUploader>,
}

impl ChunkUpload {
    pub fn new(tx_id: impl Into<String>, uploader: Box<dyn ChunkUploader>) -> Self {
        Self {
            tx_id: tx_id.into(),
            uploader,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.uploader.is_complete()
    }

    /// Index of the chunk the next call to [`next`](Self::next) uploads.
    pub fn next_chunk(&self) -> usize {
        self.uploader.uploaded_chunks()
    }

    pub fn total_chunks(&self) -> usize {
        self.uploader.total_chunks()
    }

    /// Upload the next chunk. `None` once the upload is complete.
    pub async fn next(&mut self) -> Option<Result<usize>> {
        if self.uploader.is_complete() {
            return None;
        }
        let chunk = self.uploader.uploaded_chunks();
        let result = self
            .uploader
            .upload_chunk()
            .await
            .map_err(|source| ReplicateError::Upload { chunk, source });
        if result.is_ok() {
            debug!(
                tx = %self.tx_id,
                chunk = chunk,
                total = self.uploader.total_chunks(),
                "uploaded chunk"
            );
        }
        Some(result.map(|_| chunk))
    }

    /// Drive the upload until the ledger reports completion. Returns the
    /// number of chunks uploaded by this call.
    pub async fn run_to_completion(&mut self) -> Result<usize> {
        let start = Instant::now();
        let mut uploaded = 0;
        while let Some(result) = self.next().await {
            result?;
            uploaded += 1;
        }
        debug!(
            tx = %self.tx_id,
            chunks = uploaded,
            elapsed_ms = start.elapsed().as_millis(),
            "upload complete"
        );
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arlocal_transport::{LedgerClient, MemoryLedger, MAX_CHUNK_SIZE};
    use arlocal_types::Transaction;

    async fn signed_upload(ledger: &MemoryLedger, len: usize) -> (Transaction, ChunkUpload) {
        let wallet = ledger.generate_wallet().await.unwrap();
        let mut tx = ledger.create_transaction(vec![1u8; len], &wallet).await.unwrap();
        ledger.sign(&mut tx, &wallet).await.unwrap();
        let uploader = ledger.uploader(&tx).await.unwrap();
        let upload = ChunkUpload::new(tx.id.clone(), uploader);
        (tx, upload)
    }

    #[tokio::test]
    async fn test_yields_chunk_indices_in_order() {
        let ledger = MemoryLedger::new();
        let (tx, mut upload) = signed_upload(&ledger, MAX_CHUNK_SIZE * 2 + 10).await;
        assert_eq!(upload.total_chunks(), 3);

        let mut seen = Vec::new();
        while let Some(chunk) = upload.next().await {
            seen.push(chunk.unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert!(upload.is_complete());
        assert!(upload.next().await.is_none());
        assert!(ledger.transaction(&tx.id).is_some());
    }

    #[tokio::test]
    async fn test_failure_reports_chunk_index() {
        let ledger = MemoryLedger::new();
        let (tx, mut upload) = signed_upload(&ledger, MAX_CHUNK_SIZE + 1).await;
        ledger.set_fail_upload_at_chunk(Some(1));

        let err = upload.run_to_completion().await.unwrap_err();
        assert!(matches!(err, ReplicateError::Upload { chunk: 1, .. }));
        assert_eq!(upload.next_chunk(), 1);
        assert!(ledger.transaction(&tx.id).is_none());
    }

    #[tokio::test]
    async fn test_resumes_after_failure() {
        let ledger = MemoryLedger::new();
        let (tx, mut upload) = signed_upload(&ledger, MAX_CHUNK_SIZE + 1).await;
        ledger.set_fail_upload_at_chunk(Some(1));
        assert!(upload.run_to_completion().await.is_err());

        ledger.set_fail_upload_at_chunk(None);
        assert_eq!(upload.run_to_completion().await.unwrap(), 1);
        assert!(ledger.transaction(&tx.id).is_some());
    }
}
