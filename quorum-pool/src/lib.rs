pub mod config;
pub mod consensus;
pub mod ports;
pub mod validator_set;

pub use config::{GossipPolicy, PoolConfig};
pub use consensus::evaluator::{QuorumPolicy, QuorumThreshold};
pub use consensus::message::Message;
pub use consensus::pool::{MessagePool, PoolStats, ReadyPayload, TallySnapshot};
pub use consensus::tally::MessageTally;
pub use ports::{NoopTransport, Transport};
pub use validator_set::{StaticValidatorSet, ValidatorSet};
