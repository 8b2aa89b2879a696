//! utils.rs
//!
//! Common types shared by the pool and the node harness.

pub mod node_id;
pub use node_id::NodeId;
