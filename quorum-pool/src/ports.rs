use quorum_common::error::Result;

use crate::consensus::message::Message;

/// Outbound side of the gossip layer.
///
/// Fire-and-forget: the pool never waits for delivery and only logs a
/// returned error.
pub trait Transport: Send + Sync {
    fn gossip(&self, msg: &Message) -> Result<()>;
}

/// Transport that drops everything. Used when the node runs without peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransport;

impl Transport for NoopTransport {
    fn gossip(&self, _msg: &Message) -> Result<()> {
        Ok(())
    }
}
