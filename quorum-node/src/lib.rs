pub mod cli;
pub mod config;
pub mod network;
pub mod runtime;

pub use config::NodeConfig;
pub use runtime::simulation::{EpochReport, Simulation};
