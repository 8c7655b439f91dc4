//! Base64url encoding utilities.
//!
//! Arweave stores binary fields (tag names and values, owners, signatures,
//! payloads) as unpadded base64url strings. These helpers wrap the `base64`
//! engine with context-aware error messages.

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Encode bytes to an unpadded base64url string.
pub fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode an unpadded base64url string.
///
/// Trailing `=` padding is tolerated since some gateways emit it.
///
/// # Arguments
/// * `b64` - base64url encoded string
/// * `context` - description for error messages (e.g. "tag name", "payload")
pub fn b64url_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(b64.trim_end_matches('='))
        .map_err(|e| anyhow!("Failed to decode {} from base64url: {}", context, e))
}

/// Decode base64url to a string with the ledger's byte-to-string transform.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, so that no tag is
/// ever dropped during decoding.
pub fn b64url_to_string(b64: &str, context: &str) -> Result<String> {
    let bytes = b64url_decode(b64, context)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Encode a string's UTF-8 bytes as base64url.
pub fn string_to_b64url(value: &str) -> String {
    b64url_encode(value.as_bytes())
}

/// Serde adapter for payload bytes carried as base64url strings.
pub mod serde_b64url {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::b64url_encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        super::b64url_decode(&encoded, "transaction data").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        // "App-Name" as it appears on the wire
        assert_eq!(string_to_b64url("App-Name"), "QXBwLU5hbWU");
        assert_eq!(b64url_to_string("QXBwLU5hbWU", "tag name").unwrap(), "App-Name");
    }

    #[test]
    fn test_padding_tolerated() {
        assert_eq!(b64url_decode("YQ==", "test").unwrap(), b"a");
    }

    #[test]
    fn test_decode_error_has_context() {
        let err = b64url_decode("not valid!!", "tag value").unwrap_err();
        assert!(err.to_string().contains("tag value"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let encoded = b64url_encode(&[0x41, 0xff, 0x42]);
        assert_eq!(b64url_to_string(&encoded, "test").unwrap(), "A\u{fffd}B");
    }
}
