//! Plain transaction copies.

use std::time::Instant;

use arlocal_types::{encode_tags, Tags};
use tracing::{debug, info};

use crate::engine::ArLocalUtils;
use crate::error::{ReplicateError, Result};
use crate::upload::ChunkUpload;
use crate::validation::validate;

impl ArLocalUtils {
    /// Copy transaction `id` from the remote ledger onto the target ledger
    /// and mine it. Returns the new transaction's id.
    ///
    /// Tags are attached unchanged and in order, and `target` is preserved.
    /// The payload is best-effort: if the remote cannot serve it in time, the
    /// copy carries the configured placeholder instead.
    pub async fn copy_transaction(&self, id: &str) -> Result<String> {
        validate(id)?;
        let start = Instant::now();

        let fetcher = self.fetcher();
        let original = fetcher.fetch_metadata(id).await?;
        let data = fetcher.fetch_raw_data(id).await;

        let new_id = self
            .publish(data, &original.tags, &original.transaction.target)
            .await?;
        self.mine().await?;

        info!(
            id = id,
            new_id = %new_id,
            elapsed_ms = start.elapsed().as_millis(),
            "copied transaction"
        );
        Ok(new_id)
    }

    /// Create, tag, sign and upload one transaction on the target ledger.
    /// Does not mine.
    pub(crate) async fn publish(&self, data: Vec<u8>, tags: &Tags, target: &str) -> Result<String> {
        let wallet = self.ensure_credential().await?;

        let mut tx = self
            .arlocal
            .create_transaction(data, wallet)
            .await
            .map_err(ReplicateError::Ledger)?;
        tx.tags.extend(encode_tags(tags));
        tx.target = target.to_string();

        self.arlocal
            .sign(&mut tx, wallet)
            .await
            .map_err(ReplicateError::Signing)?;
        debug!(id = %tx.id, tags = tags.len(), bytes = tx.data.len(), "signed transaction");

        let uploader = self
            .arlocal
            .uploader(&tx)
            .await
            .map_err(|source| ReplicateError::Upload { chunk: 0, source })?;
        ChunkUpload::new(tx.id.clone(), uploader)
            .run_to_completion()
            .await?;
        Ok(tx.id)
    }
}
