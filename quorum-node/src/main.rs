use clap::Parser;
use quorum_node::{cli::Args, NodeConfig, Simulation};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // consensus events go to the audit file when one is given
    let (file_layer, _guard) = match &args.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(
                dir,
                path.file_name().ok_or("log file path has no file name")?,
            );
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target() == "consensus"
                }));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,quorum_pool=debug".into()),
    );

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    let config = match &args.config {
        Some(path) => {
            info!("Config: {}", path.display());
            NodeConfig::load_from_file(path)?
        }
        None => NodeConfig::local_cluster(args.nodes, args.epochs),
    };

    if let Some(path) = &args.write_default_config {
        config.save_to_file(path)?;
        info!("📝 Config written to {}", path.display());
        return Ok(());
    }

    info!(
        "--- Starting {} nodes for {} epochs ---",
        config.nodes.len(),
        config.committees.len()
    );

    let simulation = Simulation::start(config)?;
    match simulation.run().await {
        Ok(reports) => {
            for report in &reports {
                info!("{}", serde_json::to_string(report)?);
            }
            info!("✅ {} epochs sealed", reports.len());
            Ok(())
        }
        Err(e) => {
            error!("❌ Simulation failed: {}", e);
            Err(e.into())
        }
    }
}
