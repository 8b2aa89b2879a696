pub mod crypto;
pub mod error;
pub mod utils;

pub use error::{QuorumError, Result};
pub use utils::NodeId;
