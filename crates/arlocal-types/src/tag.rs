//! Transaction tags.
//!
//! On the ledger a tag is a pair of base64url-encoded byte strings
//! ([`RawTag`]). The replication engine always works on the decoded form
//! ([`Tag`]) and re-encodes when attaching tags to a new transaction.
//!
//! Tag names are not unique. [`Tags`] keeps the original order and resolves
//! lookups by name to the *first* matching tag, which is how SmartWeave tooling
//! reads contract tags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::{b64url_to_string, string_to_b64url};

/// A tag as stored on the ledger: both fields base64url-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
    pub value: String,
}

/// A decoded name/value tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Encode into the ledger representation.
    pub fn encode(&self) -> RawTag {
        RawTag {
            name: string_to_b64url(&self.name),
            value: string_to_b64url(&self.value),
        }
    }
}

impl RawTag {
    /// Decode into plain strings.
    pub fn decode(&self) -> Result<Tag> {
        let name = b64url_to_string(&self.name, "tag name")?;
        let value = b64url_to_string(&self.value, "tag value")
            .with_context(|| format!("tag '{}'", name))?;
        Ok(Tag { name, value })
    }
}

/// Ordered tag list with first-match lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Value of the first tag named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    /// Index of the first tag named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|tag| tag.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of tags named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.0.iter().filter(|tag| tag.name == name).count()
    }

    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| Tag::new(n, v)).collect())
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decode a wire tag list. Order is preserved and no tag is dropped.
pub fn decode_tags(raw: &[RawTag]) -> Result<Tags> {
    raw.iter()
        .enumerate()
        .map(|(i, tag)| tag.decode().with_context(|| format!("tag #{}", i)))
        .collect::<Result<Vec<_>>>()
        .map(Tags)
}

/// Encode decoded tags into the wire representation, preserving order.
pub fn encode_tags(tags: &Tags) -> Vec<RawTag> {
    tags.iter().map(Tag::encode).collect()
}
