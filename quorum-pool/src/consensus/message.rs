use serde::{Serialize, Deserialize};

use quorum_common::{crypto::hash::digest, utils::NodeId};

/// A gossiped consensus artifact (vote, proposal encoding, ...) plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Hex SHA-256 of `data`. Computed by the pool when absent.
    #[serde(default)]
    pub hash: Option<String>,

    /// Arbitrary payload bytes. The pool never inspects them.
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,

    /// Validator that originated the message.
    pub from: NodeId,
}

impl Message {
    pub fn new(from: impl Into<NodeId>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            hash: None,
            data: data.into(),
            from: from.into(),
        }
    }

    /// Attaches a pre-computed hash (e.g. carried in the gossip envelope).
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Returns the pre-set hash, or the digest of `data` when there is none.
    pub fn resolved_hash(&self) -> String {
        match &self.hash {
            Some(hash) if !hash.is_empty() => hash.to_ascii_lowercase(),
            _ => digest(&self.data),
        }
    }
}
