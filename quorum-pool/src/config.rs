use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use quorum_common::{
    error::{QuorumError, Result},
    utils::NodeId,
};

use crate::consensus::evaluator::QuorumPolicy;

/// Default bound of the acknowledged-hash cache (FIFO pruned).
pub const DEFAULT_CONSUMED_CACHE_SIZE: usize = 50_000;

/// Which accepted messages the pool hands to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GossipPolicy {
    /// Never broadcast. The caller owns dissemination.
    Never,
    /// Broadcast only messages originated by this node.
    #[default]
    LocalOnly,
    /// Re-broadcast everything accepted, including network-received messages.
    All,
}

impl GossipPolicy {
    pub fn should_gossip(&self, from: &NodeId, local: &NodeId) -> bool {
        match self {
            GossipPolicy::Never => false,
            GossipPolicy::LocalOnly => from == local,
            GossipPolicy::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub gossip: GossipPolicy,
    pub quorum: QuorumPolicy,
    /// Drop messages whose pre-set hash is not the digest of their payload.
    pub verify_hash: bool,
    pub consumed_cache_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            gossip: GossipPolicy::default(),
            quorum: QuorumPolicy::default(),
            verify_hash: true,
            consumed_cache_size: DEFAULT_CONSUMED_CACHE_SIZE,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        self.quorum.validate()?;
        if self.consumed_cache_size == 0 {
            return Err(QuorumError::Config(
                "consumed_cache_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed: PoolConfig = serde_json::from_str(&data)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
