//! Ledger transaction model.
//!
//! Field layout follows the JSON served by Arweave gateways at `GET /tx/{id}`.
//! Binary fields (owner, signature, payload) are base64url strings on the wire;
//! the payload is held decoded in [`Transaction::data`].
//!
//! Lifecycle: created unsigned with a payload and owner, tags appended, signed
//! (which fixes [`Transaction::id`]), then uploaded in chunks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::encoding::serde_b64url;
use crate::tag::{decode_tags, RawTag, Tag, Tags};

/// An Arweave transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "default_format")]
    pub format: u8,

    /// Assigned at signing time; empty while unsigned.
    #[serde(default)]
    pub id: String,

    /// Anchor (previous transaction of the owner or a recent block).
    #[serde(default)]
    pub last_tx: String,

    /// Owner public key, base64url.
    #[serde(default)]
    pub owner: String,

    /// Tags in wire form, order preserved.
    #[serde(default)]
    pub tags: Vec<RawTag>,

    /// Transfer target wallet, empty for data transactions.
    #[serde(default)]
    pub target: String,

    #[serde(default = "zero")]
    pub quantity: String,

    /// Inline payload. Gateways leave it empty for format 2 transactions whose
    /// data was uploaded in chunks; use the raw-data endpoint in that case.
    #[serde(default, with = "serde_b64url")]
    pub data: Vec<u8>,

    #[serde(default = "zero")]
    pub data_size: String,

    #[serde(default)]
    pub data_root: String,

    #[serde(default = "zero")]
    pub reward: String,

    /// Populated by signing.
    #[serde(default)]
    pub signature: String,
}

fn default_format() -> u8 {
    2
}

fn zero() -> String {
    "0".to_string()
}

impl Transaction {
    /// Create an unsigned transaction carrying `data`.
    pub fn new(data: Vec<u8>, owner: impl Into<String>) -> Self {
        Self {
            format: default_format(),
            owner: owner.into(),
            data_size: data.len().to_string(),
            data,
            quantity: zero(),
            reward: zero(),
            ..Default::default()
        }
    }

    /// Append a tag, encoding it for the wire.
    pub fn add_tag(&mut self, name: &str, value: &str) {
        self.tags.push(Tag::new(name, value).encode());
    }

    /// Decode all tags, preserving order.
    pub fn decoded_tags(&self) -> Result<Tags> {
        decode_tags(&self.tags)
    }

    /// Decoded value of the first tag named `name`.
    ///
    /// Tags that fail to decode are skipped by this convenience lookup; use
    /// [`Transaction::decoded_tags`] when decode failures must surface.
    pub fn get_tag(&self, name: &str) -> Option<String> {
        self.tags
            .iter()
            .filter_map(|raw| raw.decode().ok())
            .find(|tag| tag.name == name)
            .map(|tag| tag.value)
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty() && !self.id.is_empty()
    }

    /// Declared payload size in bytes.
    pub fn declared_data_size(&self) -> u64 {
        self.data_size.parse().unwrap_or(self.data.len() as u64)
    }
}
