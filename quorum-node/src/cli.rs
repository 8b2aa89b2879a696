use std::path::PathBuf;

use clap::Parser;

/// Runs an in-process committee of message pools through a series of epochs.
#[derive(Debug, Clone, Parser)]
#[command(name = "quorum-node", version, about)]
pub struct Args {
    /// JSON cluster config. A local cluster is generated when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of nodes of the generated cluster.
    #[arg(long, default_value_t = 4)]
    pub nodes: usize,

    /// Number of epochs of the generated cluster.
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Also write consensus events to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the generated config to this path and exit.
    #[arg(long)]
    pub write_default_config: Option<PathBuf>,
}
