use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use quorum_common::{crypto::hash, utils::NodeId};

use crate::{
    config::{GossipPolicy, PoolConfig},
    ports::Transport,
    validator_set::ValidatorSet,
};

use super::{
    evaluator::QuorumThreshold,
    message::Message,
    tally::MessageTally,
};

/// A payload that reached quorum under the active committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadyPayload {
    pub hash: String,
    #[serde(with = "hex::serde")]
    pub proposal: Vec<u8>,
}

/// Read-only view of one tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallySnapshot {
    pub hash: String,
    pub voters: Vec<NodeId>,
    pub ready: bool,
}

impl TallySnapshot {
    pub fn count(&self) -> usize {
        self.voters.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub epoch: u64,
    pub tallies: usize,
    pub ready: usize,
    pub consumed: usize,
    pub accepted_votes: u64,
    pub duplicate_votes: u64,
    pub dropped_ineligible: u64,
    pub dropped_invalid_hash: u64,
    pub dropped_consumed: u64,
}

/// Outcome of the accept path. Never surfaced to `add` callers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Admission {
    Ineligible,
    InvalidHash,
    Consumed,
    Duplicate,
    Counted { hash: String },
}

struct PoolState {
    tallies: HashMap<String, MessageTally>,
    validator_set: Option<Arc<dyn ValidatorSet>>,
    epoch: u64,
    // acknowledged hashes, pruned FIFO
    consumed: HashSet<String>,
    consumed_order: VecDeque<String>,
    stats: PoolStats,
}

/// Collects gossiped consensus messages and tracks which payloads reached quorum.
///
/// Every mutation (tally creation, vote recording, quorum flagging, committee
/// swap) happens inside one write-locked critical section, so readers never
/// observe a vote without its quorum re-evaluation and no message is judged
/// against a mix of two committees.
///
/// Until the first [`MessagePool::reset`] installs a committee, every message
/// is dropped.
pub struct MessagePool {
    local: NodeId,
    transport: Arc<dyn Transport>,
    threshold: Arc<dyn QuorumThreshold>,
    gossip: GossipPolicy,
    verify_hash: bool,
    consumed_cache_size: usize,
    state: RwLock<PoolState>,
}

impl MessagePool {
    pub fn new(local: NodeId, transport: Arc<dyn Transport>) -> Self {
        Self::with_config(local, transport, &PoolConfig::default())
    }

    pub fn with_config(local: NodeId, transport: Arc<dyn Transport>, config: &PoolConfig) -> Self {
        Self {
            local,
            transport,
            threshold: Arc::new(config.quorum.clone()),
            gossip: config.gossip,
            verify_hash: config.verify_hash,
            consumed_cache_size: config.consumed_cache_size.max(1),
            state: RwLock::new(PoolState {
                tallies: HashMap::new(),
                validator_set: None,
                epoch: 0,
                consumed: HashSet::new(),
                consumed_order: VecDeque::new(),
                stats: PoolStats::default(),
            }),
        }
    }

    /// Replaces the quorum threshold derived from the config.
    pub fn with_threshold(mut self, threshold: Arc<dyn QuorumThreshold>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn local(&self) -> &NodeId {
        &self.local
    }

    /// Ingests a message. Ineligible senders, replays and malformed hashes are
    /// dropped silently; poll [`MessagePool::get_ready`] or
    /// [`MessagePool::tally`] to observe the effect.
    pub fn add(&self, msg: Message) {
        let outbound = self
            .gossip
            .should_gossip(&msg.from, &self.local)
            .then(|| msg.clone());

        let admission = {
            let mut state = self.write();
            self.accept(&mut state, msg)
        };

        if let (Admission::Counted { hash }, Some(msg)) = (admission, outbound) {
            self.broadcast(&msg.with_hash(hash));
        }
    }

    /// Payloads whose tally is ready, sorted by hash.
    ///
    /// They stay in the pool until [`MessagePool::acknowledge`] is called, so
    /// repeated polling returns the same set.
    pub fn get_ready(&self) -> Vec<ReadyPayload> {
        let state = self.read();
        let mut ready: Vec<ReadyPayload> = state
            .tallies
            .iter()
            .filter(|(_, tally)| tally.is_ready())
            .map(|(hash, tally)| ReadyPayload {
                hash: hash.clone(),
                proposal: tally.proposal().to_vec(),
            })
            .collect();
        ready.sort_by(|a, b| a.hash.cmp(&b.hash));
        ready
    }

    /// Marks a ready payload as consumed by the sealing logic.
    ///
    /// The tally is removed and later votes for the same hash are ignored.
    /// Returns `false` if the hash is unknown or has not reached quorum.
    pub fn acknowledge(&self, hash: &str) -> bool {
        let hash = hash.to_ascii_lowercase();
        let mut state = self.write();

        match state.tallies.get(&hash) {
            Some(tally) if tally.is_ready() => {}
            _ => return false,
        }

        state.tallies.remove(&hash);
        if state.consumed.insert(hash.clone()) {
            state.consumed_order.push_back(hash.clone());
        }
        while state.consumed_order.len() > self.consumed_cache_size {
            if let Some(old) = state.consumed_order.pop_front() {
                state.consumed.remove(&old);
            }
        }

        debug!(target: "consensus", "📦 Payload [{}] acknowledged", short(&hash));
        true
    }

    /// Installs a new committee.
    ///
    /// All tallies are purged, ready ones included: quorum has to be
    /// re-established under the new membership and threshold. The local
    /// node's own votes are re-submitted against the new committee within the
    /// same critical section and re-gossiped afterwards.
    ///
    /// Acknowledged hashes are kept: a payload sealed in an earlier epoch
    /// stays sealed under the new committee.
    pub fn reset(&self, validator_set: Arc<dyn ValidatorSet>) {
        let regossip = {
            let mut state = self.write();
            let committee_size = validator_set.size();
            state.validator_set = Some(validator_set);
            state.epoch += 1;

            let reschedule: Vec<Message> = state
                .tallies
                .values()
                .filter_map(|tally| tally.vote_from(&self.local).cloned())
                .collect();
            let purged = state.tallies.len();
            state.tallies.clear();

            let mut regossip = Vec::new();
            let mut restored = 0usize;
            for msg in reschedule {
                let outbound = self
                    .gossip
                    .should_gossip(&msg.from, &self.local)
                    .then(|| msg.clone());
                if let Admission::Counted { hash } = self.accept(&mut state, msg) {
                    restored += 1;
                    if let Some(msg) = outbound {
                        regossip.push(msg.with_hash(hash));
                    }
                }
            }

            info!(
                target: "consensus",
                "🔄 Epoch {}: committee of {} installed, {} tallies purged, {} local votes restored",
                state.epoch, committee_size, purged, restored
            );
            regossip
        };

        for msg in &regossip {
            self.broadcast(msg);
        }
    }

    pub fn tally(&self, hash: &str) -> Option<TallySnapshot> {
        let hash = hash.to_ascii_lowercase();
        let state = self.read();
        state.tallies.get(&hash).map(|tally| TallySnapshot {
            hash: hash.clone(),
            voters: tally.voters(),
            ready: tally.is_ready(),
        })
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.read();
        PoolStats {
            epoch: state.epoch,
            tallies: state.tallies.len(),
            ready: state.tallies.values().filter(|t| t.is_ready()).count(),
            consumed: state.consumed.len(),
            ..state.stats.clone()
        }
    }

    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Size of the installed committee, `None` before the first reset.
    pub fn committee_size(&self) -> Option<usize> {
        self.read().validator_set.as_ref().map(|set| set.size())
    }

    pub fn len(&self) -> usize {
        self.read().tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn accept(&self, state: &mut PoolState, mut msg: Message) -> Admission {
        let committee_size = match &state.validator_set {
            Some(set) if set.includes(&msg.from) => set.size(),
            _ => {
                state.stats.dropped_ineligible += 1;
                debug!("Ignored message from non-validator [{}]", msg.from);
                return Admission::Ineligible;
            }
        };

        if let Some(preset) = msg.hash.as_deref().filter(|h| !h.is_empty()) {
            if self.verify_hash && !hash::matches(preset, &msg.data) {
                state.stats.dropped_invalid_hash += 1;
                warn!("⚠️ Hash mismatch on message from [{}], dropped", msg.from);
                return Admission::InvalidHash;
            }
        }
        let hash = msg.resolved_hash();
        msg.hash = Some(hash.clone());

        if state.consumed.contains(&hash) {
            state.stats.dropped_consumed += 1;
            debug!("Ignored vote from [{}] on consumed payload [{}]", msg.from, short(&hash));
            return Admission::Consumed;
        }

        let voter = msg.from.clone();
        let tally = state
            .tallies
            .entry(hash.clone())
            .or_insert_with(|| MessageTally::new(msg.data.clone()));

        let before = tally.len();
        let voters = tally.add_vote(msg);
        if voters == before {
            state.stats.duplicate_votes += 1;
            debug!("Duplicate vote from [{}] on [{}]", voter, short(&hash));
            return Admission::Duplicate;
        }
        state.stats.accepted_votes += 1;

        if self.threshold.is_reached(voters, committee_size) && tally.mark_ready() {
            info!(
                target: "consensus",
                "🗳️ Payload [{}] reached quorum: {}/{} validators ✅",
                short(&hash), voters, committee_size
            );
        } else {
            debug!("📥 [{}] voted on [{}] ({}/{})", voter, short(&hash), voters, committee_size);
        }

        Admission::Counted { hash }
    }

    fn broadcast(&self, msg: &Message) {
        if let Err(e) = self.transport.gossip(msg) {
            warn!("⚠️ Gossip failed for message from [{}]: {}", msg.from, e);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PoolState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PoolState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn short(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
