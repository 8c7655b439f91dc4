//! Identifier validation.
//!
//! Every caller-supplied id, and every id read from a contract tag that is
//! about to be fetched, goes through [`validate`] before any network access.

use arlocal_types::is_valid_tx_id;

use crate::error::{ReplicateError, Result};

/// Fail with [`ReplicateError::InvalidIdentifier`] unless `id` has the
/// ledger's 43-character base64url shape.
pub fn validate(id: &str) -> Result<()> {
    if is_valid_tx_id(id) {
        Ok(())
    } else {
        Err(ReplicateError::InvalidIdentifier { id: id.to_string() })
    }
}

/// Validate an id taken from a tag of `contract_id`. A bad value makes the
/// contract malformed rather than the caller's input invalid.
pub(crate) fn validate_referenced(contract_id: &str, tag: &str, id: &str) -> Result<()> {
    if is_valid_tx_id(id) {
        Ok(())
    } else {
        Err(ReplicateError::malformed(
            contract_id,
            format!("{} tag holds invalid transaction id '{}'", tag, id),
        ))
    }
}
