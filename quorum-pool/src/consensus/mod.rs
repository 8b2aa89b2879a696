//! consensus
//!
//! Message aggregation for the consensus engine.
//!
//! Gossiped votes and proposals are keyed by the SHA-256 digest of their
//! payload, tallied per validator, and flagged ready once the injected quorum
//! threshold is met under the active committee. The sealing logic polls the
//! pool for ready payloads and acknowledges them once they are included.

pub mod evaluator;
pub mod message;
pub mod pool;
pub mod tally;
