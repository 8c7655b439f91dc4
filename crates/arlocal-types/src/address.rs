//! Transaction identifier shape checks.
//!
//! Arweave transaction ids (and wallet addresses) are the unpadded base64url
//! encoding of a 32-byte hash: exactly 43 characters from `[a-zA-Z0-9_-]`.

/// Length of a transaction identifier.
pub const TX_ID_LENGTH: usize = 43;

/// Check whether `id` has the shape of a transaction identifier.
///
/// Pure: no decoding, no I/O.
///
/// # Examples
///
/// ```
/// use arlocal_types::address::is_valid_tx_id;
///
/// assert!(is_valid_tx_id("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw"));
/// assert!(!is_valid_tx_id("short"));
/// ```
pub fn is_valid_tx_id(id: &str) -> bool {
    id.len() == TX_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_ids() {
        assert!(is_valid_tx_id("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw"));
        assert!(is_valid_tx_id("8IlrRJR3ez3orz3UIchEpuupaXYXZMwCbMiid1u5Ryo"));
        assert!(is_valid_tx_id("-8A6RexFkpfWwuyVO98wzSFZh0d6VJuI-buTJvlwOJQ"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!is_valid_tx_id(""));
        assert!(!is_valid_tx_id("short"));
        assert!(!is_valid_tx_id("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFq"));
        assert!(!is_valid_tx_id("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqwA"));
    }

    #[test]
    fn test_rejects_foreign_alphabet() {
        assert!(!is_valid_tx_id("FGz4VCxU8+jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw"));
        assert!(!is_valid_tx_id("FGz4VCxU8/jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw"));
        assert!(!is_valid_tx_id("FGz4VCxU8 jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw"));
        assert!(!is_valid_tx_id("FGz4VCxU8éjsLeRth4aaJ586tcwgy96ot-3qD5wAFq"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_valid_tx_id(&"a".repeat(TX_ID_LENGTH)));
        assert!(is_valid_tx_id(&"A".repeat(TX_ID_LENGTH)));
    }
}
