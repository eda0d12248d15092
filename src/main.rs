use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use snap_updater::config::{SnapEnvironment, UpdaterConfig, log_path};
use snap_updater::store::SnapcraftStore;
use snap_updater::updater::{
    Advisory, UpdateCoordinator, announce_replacement, check_new_version,
};

#[derive(Parser)]
#[command(name = "snap-updater")]
#[command(version, about = "Checks a running snap against the Snap Store channel map")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single update check and print the advisory
    Check {
        #[command(flatten)]
        common: CommonArgs,
        /// Print the advisory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check periodically until interrupted
    Watch {
        #[command(flatten)]
        common: CommonArgs,
        /// Seconds between checks (overrides the config file)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Version of the running software
    #[arg(long, env = "SNAP_VERSION")]
    current_version: String,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CommonArgs {
    fn load(&self) -> anyhow::Result<(UpdaterConfig, SnapEnvironment)> {
        let config = match &self.config {
            Some(path) => UpdaterConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => UpdaterConfig::default(),
        };
        let environment = SnapEnvironment::from_env(&self.current_version)?;
        Ok((config, environment))
    }
}

/// Log to stderr, and to `log_file` when given. Filter with `RUST_LOG`.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "snap_updater=info".into());
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("snap-updater.log");
            let file_appender = tracing_appender::rolling::daily(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

fn print_advisory(advisory: &Advisory, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(advisory)?);
        return Ok(());
    }

    println!(
        "Update available: {}",
        if advisory.update_available { "yes" } else { "no" }
    );
    for (name, value) in advisory.attributes() {
        println!("{}: {}", name, value);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check { common, json } => {
            let _guard = init_logging(None);
            let (config, environment) = common.load()?;
            let store = SnapcraftStore::new(&config.store_url, &config.snap_name);
            announce_replacement();

            let advisory = check_new_version(&store, &environment, &config)
                .await
                .context("Update check failed")?;
            print_advisory(&advisory, json)
        }
        Command::Watch { common, interval } => {
            let log_file = log_path();
            if let Some(dir) = log_file.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            }
            let _guard = init_logging(Some(&log_file));

            let (mut config, environment) = common.load()?;
            if let Some(secs) = interval {
                config.check_interval = secs.saturating_mul(1000);
            }
            info!(
                "Watching {} every {:?}",
                config.snap_name,
                config.check_interval()
            );

            let store = Arc::new(SnapcraftStore::new(&config.store_url, &config.snap_name));
            let coordinator = UpdateCoordinator::new(store, environment, config);

            tokio::select! {
                _ = coordinator.run() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping update checks");
                }
            }

            if let Some(advisory) = coordinator.advisory().await {
                print_advisory(&advisory, false)?;
            }
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
