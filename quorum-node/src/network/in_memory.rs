use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use quorum_common::{
    error::{QuorumError, Result},
    utils::NodeId,
};
use quorum_pool::{Message, MessagePool, Transport};

/// Full-mesh gossip over in-process channels.
#[derive(Clone)]
pub struct InMemoryNetwork {
    pub id: NodeId,
    peers: Arc<Mutex<HashMap<NodeId, UnboundedSender<Message>>>>,
}

impl InMemoryNetwork {
    pub fn new(id: NodeId) -> (Self, UnboundedSender<Message>, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (Self {
            id,
            peers: Arc::new(Mutex::new(HashMap::new())),
        }, tx, rx)
    }

    pub fn add_peer(&self, peer_id: NodeId, sender: UnboundedSender<Message>) {
        if peer_id == self.id {
            return;
        }
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(peer_id, sender);
    }

    pub fn connected_peers(&self) -> Vec<NodeId> {
        let mut peers: Vec<NodeId> = self
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        peers.sort();
        peers
    }

    /// Delivers inbound messages to `pool` until every sender is dropped.
    pub async fn run(id: NodeId, pool: Arc<MessagePool>, mut rx: UnboundedReceiver<Message>) {
        while let Some(msg) = rx.recv().await {
            pool.add(msg);
        }
        debug!("Inbound channel of [{}] closed", id);
    }
}

impl Transport for InMemoryNetwork {
    fn gossip(&self, msg: &Message) -> Result<()> {
        let peers = self.peers.lock().unwrap_or_else(PoisonError::into_inner).clone();

        let mut unreachable = Vec::new();
        for (peer_id, sender) in peers {
            if sender.send(msg.clone()).is_err() {
                unreachable.push(peer_id.to_string());
            }
        }

        if unreachable.is_empty() {
            Ok(())
        } else {
            unreachable.sort();
            Err(QuorumError::Transport(format!("peers unreachable: {}", unreachable.join(", "))))
        }
    }
}
