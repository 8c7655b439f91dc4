//! Signing credential.
//!
//! The replication engine treats a wallet as opaque: it is produced by a ledger
//! client's `generate_wallet` (or supplied by the caller) and handed back to the
//! same client for signing. Arweave wallets are RSA JWKs; in-process ledgers may
//! use any JSON shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque signing key in JWK form.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wallet {
    jwk: Value,
}

impl Wallet {
    pub fn from_jwk(jwk: Value) -> Self {
        Self { jwk }
    }

    pub fn jwk(&self) -> &Value {
        &self.jwk
    }

    /// The JWK modulus (`n`), which is the owner field of signed transactions.
    pub fn owner(&self) -> Option<&str> {
        self.jwk.get("n").and_then(Value::as_str)
    }
}

// Never print key material.
impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("owner", &self.owner())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_private_fields() {
        let wallet = Wallet::from_jwk(serde_json::json!({"kty": "RSA", "n": "pub", "d": "secret"}));
        let printed = format!("{:?}", wallet);
        assert!(printed.contains("pub"));
        assert!(!printed.contains("secret"));
        assert_eq!(wallet.owner(), Some("pub"));
    }
}
