use tracing::info;

use quorum_pool::{MessagePool, ReadyPayload};

/// Seals every payload the pool reports ready and acknowledges it.
///
/// Acknowledging only succeeds once per hash, so two sealers polling the
/// same pool never seal a payload twice.
pub fn seal_ready(pool: &MessagePool) -> Vec<ReadyPayload> {
    let sealed: Vec<ReadyPayload> = pool
        .get_ready()
        .into_iter()
        .filter(|payload| pool.acknowledge(&payload.hash))
        .collect();

    if !sealed.is_empty() {
        info!(
            target: "consensus",
            "⛏️ [{}] sealed {} payload(s) in epoch {}",
            pool.local(), sealed.len(), pool.epoch()
        );
    }
    sealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quorum_common::utils::NodeId;
    use quorum_pool::{Message, NoopTransport, StaticValidatorSet};

    #[test]
    fn test_seal_ready_acknowledges_once() {
        let pool = MessagePool::new(NodeId::from("A"), Arc::new(NoopTransport));
        pool.reset(Arc::new(StaticValidatorSet::new(["A", "B", "C"])));

        pool.add(Message::new("A", b"block".to_vec()));
        assert!(seal_ready(&pool).is_empty());

        pool.add(Message::new("B", b"block".to_vec()));
        let sealed = seal_ready(&pool);
        assert_eq!(sealed.len(), 1);
        assert_eq!(sealed[0].proposal, b"block".to_vec());

        assert!(seal_ready(&pool).is_empty());
        assert!(pool.is_empty());
    }
}
