use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use quorum_common::{
    error::{QuorumError, Result},
    utils::NodeId,
};
use quorum_pool::PoolConfig;

/// Cluster description consumed by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Every node attached to the gossip network.
    pub nodes: Vec<NodeId>,
    /// Active committee for each epoch, in order.
    pub committees: Vec<Vec<NodeId>>,
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    #[serde(default)]
    pub pool: PoolConfig,
}

fn default_settle_timeout_ms() -> u64 {
    2_000
}

impl NodeConfig {
    /// `nodes` validators where epoch `e` leaves out validator `e % nodes`,
    /// so every epoch rotates the committee.
    pub fn local_cluster(nodes: usize, epochs: usize) -> Self {
        let ids: Vec<NodeId> = (0..nodes).map(|i| NodeId(format!("validator-{}", i))).collect();

        let committees = (0..epochs)
            .map(|epoch| {
                if ids.len() < 2 {
                    return ids.clone();
                }
                let out = epoch % ids.len();
                ids.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != out)
                    .map(|(_, id)| id.clone())
                    .collect()
            })
            .collect();

        Self {
            nodes: ids,
            committees,
            settle_timeout_ms: default_settle_timeout_ms(),
            pool: PoolConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(QuorumError::Config("cluster has no nodes".to_string()));
        }
        let known: HashSet<&NodeId> = self.nodes.iter().collect();
        if known.len() != self.nodes.len() {
            return Err(QuorumError::Config("duplicate node id in cluster".to_string()));
        }
        if self.committees.is_empty() {
            return Err(QuorumError::Config("at least one epoch committee is required".to_string()));
        }
        for (epoch, committee) in self.committees.iter().enumerate() {
            if committee.is_empty() {
                return Err(QuorumError::Config(format!("committee of epoch {} is empty", epoch)));
            }
            if let Some(stranger) = committee.iter().find(|id| !known.contains(id)) {
                return Err(QuorumError::Config(format!(
                    "committee of epoch {} names unknown node {}",
                    epoch, stranger
                )));
            }
        }
        self.pool.validate()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed: NodeConfig = serde_json::from_str(&data)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
