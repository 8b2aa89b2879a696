use std::collections::HashSet;

use quorum_common::utils::NodeId;

/// Point-in-time view of the active committee.
///
/// The pool only asks two questions of it. Implementations are swapped
/// whole on epoch change, never mutated while installed.
pub trait ValidatorSet: Send + Sync {
    fn includes(&self, id: &NodeId) -> bool;
    fn size(&self) -> usize;
}

/// Immutable committee built from a list of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticValidatorSet {
    members: HashSet<NodeId>,
}

impl StaticValidatorSet {
    pub fn new<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Members, sorted.
    pub fn members(&self) -> Vec<NodeId> {
        let mut members: Vec<NodeId> = self.members.iter().cloned().collect();
        members.sort();
        members
    }
}

impl ValidatorSet for StaticValidatorSet {
    fn includes(&self, id: &NodeId) -> bool {
        self.members.contains(id)
    }

    fn size(&self) -> usize {
        self.members.len()
    }
}
