//! Blueprint training binary: wires a [`bp_mccfr::BlueprintTrainer`] to a
//! TOML config file, a loaded (or synthesized) cluster abstraction, and the
//! process's logging/interrupt plumbing.
mod demo;

use anyhow::Context;
use bp_clustering::ClusterMap;
use bp_core::Epoch;
use bp_mccfr::TrainerConfig;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Trains a no-limit hold'em blueprint strategy with external-sampling MCCFR.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML file overriding `TrainerConfig::default()`. Missing
    /// fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Train until this many total iterations have run. Mutually exclusive
    /// with `--duration`; if neither is given, trains until interrupted.
    #[arg(long)]
    iterations: Option<Epoch>,

    /// Train for a wall-clock budget ("30m", "2h", "1d") instead of a fixed
    /// iteration count. Parsed and handed to `bp_core::listen_for_stop`.
    #[arg(long)]
    duration: Option<String>,

    /// Directory holding `flop_N_0.dat`/`turn_N_0.dat`/`river_N_0.dat`
    /// cluster tables. Omit to run against synthetic identity tables instead
    /// (useful for smoke-testing the pipeline without a real abstraction).
    #[arg(long)]
    cluster_dir: Option<PathBuf>,

    /// Cluster count the loaded (or synthesized) postflop tables use.
    #[arg(long, default_value_t = bp_core::POSTFLOP_CLUSTERS)]
    n_clusters: usize,

    /// Directory for periodic training snapshots.
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Directory for periodic training-progress metrics.
    #[arg(long, default_value = "metrics")]
    metrics_dir: PathBuf,

    /// Install a hard Ctrl+C handler that exits immediately, bypassing the
    /// graceful "finish the current batch" shutdown path.
    #[arg(long)]
    hard_kill: bool,
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<TrainerConfig> {
    let Some(path) = path else {
        return Ok(TrainerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing TOML config '{}'", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bp_core::install_logger();
    if cli.hard_kill {
        bp_core::kill_on_ctrl_c();
    }
    let deadline = cli
        .duration
        .as_deref()
        .map(|d| bp_core::parse_duration(d).with_context(|| format!("invalid --duration '{d}'")))
        .transpose()?;
    bp_core::listen_for_stop(deadline);

    let config = load_config(cli.config.as_deref())?;
    // an explicit --iterations count wins; otherwise train until
    // listen_for_stop's deadline or stdin "Q" trips bp_core::interrupted().
    let target = cli.iterations.unwrap_or(Epoch::MAX);

    let indexer = Arc::new(demo::DemoIsomorphism::new(cli.n_clusters as u64));
    let clusters = Arc::new(match &cli.cluster_dir {
        Some(dir) => ClusterMap::load(dir, indexer, cli.n_clusters)?,
        None => {
            log::warn!("no --cluster-dir given, training against a synthetic identity abstraction");
            let identity: Vec<u16> = (0..cli.n_clusters as u16).collect();
            ClusterMap::from_tables(indexer, identity.clone(), identity.clone(), identity)
        }
    });

    let mut trainer = bp_mccfr::BlueprintTrainer::new(config, clusters, Arc::new(demo::DemoEvaluator))?;
    trainer.set_snapshot_dir(cli.snapshot_dir);
    trainer.set_metrics_dir(cli.metrics_dir);

    log::info!("training toward t={target}");
    trainer.mccfr_p(target)?;
    log::info!("stopped at t={}", trainer.epoch());
    Ok(())
}
