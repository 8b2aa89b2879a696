use std::collections::HashMap;

use quorum_common::utils::NodeId;

use super::message::Message;

/// Stores which validators voted for one payload hash.
///
/// Pure bookkeeping: it knows nothing about the committee or the threshold.
/// The pool decides when a tally becomes ready.
#[derive(Debug, Clone)]
pub struct MessageTally {
    // NodeID -> first message seen from that validator
    votes: HashMap<NodeId, Message>,

    // payload bytes of the first copy seen for this hash
    proposal: Vec<u8>,

    ready: bool,
}

impl MessageTally {
    pub fn new(proposal: Vec<u8>) -> Self {
        Self {
            votes: HashMap::new(),
            proposal,
            ready: false,
        }
    }

    /// Records the vote of `msg.from`, keeping the first one on repeats.
    /// Returns the number of distinct voters.
    pub fn add_vote(&mut self, msg: Message) -> usize {
        self.votes.entry(msg.from.clone()).or_insert(msg);
        self.votes.len()
    }

    /// Returns the message submitted by `id`, if it voted.
    pub fn vote_from(&self, id: &NodeId) -> Option<&Message> {
        self.votes.get(id)
    }

    pub fn has_vote_from(&self, id: &NodeId) -> bool {
        self.votes.contains_key(id)
    }

    /// Flags the tally as ready. Returns `true` only on the false -> true transition.
    pub fn mark_ready(&mut self) -> bool {
        let transitioned = !self.ready;
        self.ready = true;
        transitioned
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn proposal(&self) -> &[u8] {
        &self.proposal
    }

    /// Voters, sorted for stable output.
    pub fn voters(&self) -> Vec<NodeId> {
        let mut voters: Vec<NodeId> = self.votes.keys().cloned().collect();
        voters.sort();
        voters
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_votes_are_counted() {
        let mut tally = MessageTally::new(vec![0x1]);

        assert_eq!(tally.add_vote(Message::new("A", vec![0x1])), 1);
        assert_eq!(tally.add_vote(Message::new("B", vec![0x1])), 2);
        assert_eq!(tally.voters(), vec![NodeId::from("A"), NodeId::from("B")]);
    }

    #[test]
    fn test_repeated_vote_is_idempotent() {
        let mut tally = MessageTally::new(vec![0x1]);
        let first = Message::new("A", vec![0x1]);

        tally.add_vote(first.clone());
        // Replay with a pre-set hash: first vote wins
        let count = tally.add_vote(first.clone().with_hash("ff"));

        assert_eq!(count, 1);
        assert_eq!(tally.vote_from(&NodeId::from("A")), Some(&first));
    }

    #[test]
    fn test_vote_from_unknown_voter() {
        let tally = MessageTally::new(Vec::new());
        assert!(tally.vote_from(&NodeId::from("Z")).is_none());
        assert!(!tally.has_vote_from(&NodeId::from("Z")));
        assert!(tally.is_empty());
    }

    #[test]
    fn test_mark_ready_reports_transition_once() {
        let mut tally = MessageTally::new(vec![0x2]);
        assert!(!tally.is_ready());

        assert!(tally.mark_ready());
        assert!(!tally.mark_ready());
        assert!(tally.is_ready());
        assert_eq!(tally.proposal(), &[0x2]);
    }
}
