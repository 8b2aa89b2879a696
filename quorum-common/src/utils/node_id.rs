use serde::{Serialize, Deserialize};

/// Identifier of a validator in the committee.
///
/// `NodeId` is a lightweight wrapper around `String`, designed to:
/// - Keep validator identifiers type safe across APIs
/// - Serve as `HashMap`/`HashSet` key for vote tallies
/// - Format directly in log lines
#[derive(Default, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    /// Example:
    /// ```rust
    /// use quorum_common::utils::NodeId;
    /// let id: NodeId = "validator-A".into();
    /// assert_eq!(id.as_str(), "validator-A");
    /// ```
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}
