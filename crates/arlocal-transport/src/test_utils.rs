//! Test utilities for ledger fixtures.
//!
//! Provides builders and helpers for constructing seeded transactions without
//! repetitive boilerplate.

use arlocal_types::encoding::b64url_encode;
use arlocal_types::Transaction;
use sha2::{Digest, Sha256};

/// Deterministic, well-formed transaction id derived from `seed`.
pub fn fixture_id(seed: &str) -> String {
    b64url_encode(&Sha256::digest(seed.as_bytes()))
}

/// Builder for creating already-signed `Transaction` fixtures, as a remote
/// gateway would serve them.
///
/// # Example
///
/// ```ignore
/// let tx = TransactionBuilder::new(&fixture_id("contract"))
///     .tag("App-Name", "SmartWeaveContract")
///     .tag("Contract-Src", &fixture_id("source"))
///     .data(b"{}")
///     .build();
/// remote.seed(tx);
/// ```
#[derive(Default)]
pub struct TransactionBuilder {
    id: String,
    owner: String,
    target: String,
    tags: Vec<(String, String)>,
    data: Vec<u8>,
}

impl TransactionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner: fixture_id("remote-owner"),
            ..Default::default()
        }
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    pub fn tag(mut self, name: &str, value: &str) -> Self {
        self.tags.push((name.to_string(), value.to_string()));
        self
    }

    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    pub fn build(self) -> Transaction {
        let mut tx = Transaction::new(self.data, self.owner);
        for (name, value) in &self.tags {
            tx.add_tag(name, value);
        }
        tx.target = self.target;
        tx.signature = b64url_encode(format!("remote-signature:{}", self.id).as_bytes());
        tx.id = self.id;
        tx
    }
}
