//! Epoch-by-epoch run of an in-process committee.
//!
//! Every node owns a [`MessagePool`] wired to an [`InMemoryNetwork`]. Each
//! epoch installs the next committee on every pool, lets the committee vote
//! on one block payload (plus a minority-backed "contested" payload), waits
//! until every pool sees the block reach quorum, and seals it.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use rand::seq::SliceRandom;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use quorum_common::{
    crypto::hash::digest,
    error::{QuorumError, Result},
    utils::NodeId,
};
use quorum_pool::{GossipPolicy, Message, MessagePool, StaticValidatorSet, ValidatorSet};

use crate::{config::NodeConfig, network::InMemoryNetwork, runtime::sealer::seal_ready};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpochReport {
    pub epoch: u64,
    pub committee: Vec<NodeId>,
    pub block_hash: String,
    /// Nodes whose pool sealed the block.
    pub sealed_by: Vec<NodeId>,
    /// Tallies left in each pool after sealing.
    pub pending: BTreeMap<NodeId, usize>,
}

struct SimNode {
    id: NodeId,
    pool: Arc<MessagePool>,
    task: JoinHandle<()>,
}

pub struct Simulation {
    config: NodeConfig,
    nodes: Vec<SimNode>,
}

impl Simulation {
    /// Builds the network and spawns one delivery task per node.
    /// Must be called from within a tokio runtime.
    pub fn start(config: NodeConfig) -> Result<Self> {
        config.validate()?;
        if config.pool.gossip == GossipPolicy::Never {
            return Err(QuorumError::Config(
                "simulation relies on gossip, gossip policy cannot be `never`".to_string(),
            ));
        }

        let endpoints: Vec<_> = config
            .nodes
            .iter()
            .map(|id| InMemoryNetwork::new(id.clone()))
            .collect();

        for (network, _, _) in &endpoints {
            for (peer, tx, _) in &endpoints {
                network.add_peer(peer.id.clone(), tx.clone());
            }
            debug!("[{}] meshed with {:?}", network.id, network.connected_peers());
        }

        let nodes = endpoints
            .into_iter()
            .map(|(network, _tx, rx)| {
                let id = network.id.clone();
                let pool = Arc::new(MessagePool::with_config(
                    id.clone(),
                    Arc::new(network),
                    &config.pool,
                ));
                let task = tokio::spawn(InMemoryNetwork::run(id.clone(), Arc::clone(&pool), rx));
                SimNode { id, pool, task }
            })
            .collect();

        Ok(Self { config, nodes })
    }

    pub fn pool(&self, id: &NodeId) -> Option<Arc<MessagePool>> {
        self.nodes
            .iter()
            .find(|node| &node.id == id)
            .map(|node| Arc::clone(&node.pool))
    }

    pub async fn run(&self) -> Result<Vec<EpochReport>> {
        let mut reports = Vec::with_capacity(self.config.committees.len());
        for committee in &self.config.committees {
            reports.push(self.run_epoch(committee).await?);
        }
        Ok(reports)
    }

    async fn run_epoch(&self, committee: &[NodeId]) -> Result<EpochReport> {
        // every pool switches before anyone votes, so no vote of this epoch is
        // judged against the previous committee
        let set = StaticValidatorSet::new(committee.iter().cloned());
        debug!("Installing committee {:?}", set.members());
        let set: Arc<dyn ValidatorSet> = Arc::new(set);
        for node in &self.nodes {
            node.pool.reset(Arc::clone(&set));
        }
        let epoch = self.nodes.first().map(|node| node.pool.epoch()).unwrap_or_default();

        let block = format!("epoch-{}/block", epoch).into_bytes();
        let block_hash = digest(&block);

        let mut voters = committee.to_vec();
        voters.shuffle(&mut rand::thread_rng());
        for voter in &voters {
            self.local_pool(voter)?.add(Message::new(voter.clone(), block.clone()));
        }

        if let Some(first) = committee.first() {
            let contested = format!("epoch-{}/contested", epoch).into_bytes();
            self.local_pool(first)?.add(Message::new(first.clone(), contested));
        }

        self.wait_for_quorum(&block_hash, epoch).await?;

        let mut sealed_by = Vec::new();
        let mut pending = BTreeMap::new();
        for node in &self.nodes {
            let sealed = seal_ready(&node.pool);
            if sealed.iter().any(|payload| payload.hash == block_hash) {
                sealed_by.push(node.id.clone());
            }
            pending.insert(node.id.clone(), node.pool.len());
        }

        info!(
            target: "consensus",
            "🏁 Epoch {} done: block [{}] sealed by {}/{} nodes",
            epoch, &block_hash[..8], sealed_by.len(), self.nodes.len()
        );

        Ok(EpochReport {
            epoch,
            committee: committee.to_vec(),
            block_hash,
            sealed_by,
            pending,
        })
    }

    async fn wait_for_quorum(&self, hash: &str, epoch: u64) -> Result<()> {
        let settle = Duration::from_millis(self.config.settle_timeout_ms);
        let all_ready = async {
            loop {
                let ready = self
                    .nodes
                    .iter()
                    .all(|node| node.pool.tally(hash).map(|t| t.ready).unwrap_or(false));
                if ready {
                    break;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(settle, all_ready).await.map_err(|_| {
            warn!("⚠️ Epoch {} did not settle within {:?}", epoch, settle);
            QuorumError::Other(format!("epoch {} did not reach quorum within {:?}", epoch, settle))
        })
    }

    fn local_pool(&self, id: &NodeId) -> Result<Arc<MessagePool>> {
        self.pool(id)
            .ok_or_else(|| QuorumError::Config(format!("unknown node {}", id)))
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        for node in &self.nodes {
            node.task.abort();
        }
    }
}
