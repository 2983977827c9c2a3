mod config;
mod cycle;
mod supervisor;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use revvy_installer::PipDependencyInstaller;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{default_root, LauncherConfig};
use cycle::{run_launcher, FilesystemSteps, LauncherOutcome, RunMode};
use supervisor::{Supervisor, VenvFrameworkProcess};

#[derive(Parser, Debug)]
#[command(name = "revvy-launcher")]
#[command(about = "Installs framework updates and supervises the newest installed version", long_about = None)]
struct Cli {
    /// Install updates but do not start the framework
    #[arg(long)]
    install_only: bool,
    /// Directory holding `installed/` and `data/`; defaults to the launcher's own directory
    #[arg(long)]
    root: Option<PathBuf>,
    /// Launcher config file; defaults to `<root>/launcher.toml` when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => default_root()?,
    };
    let config = LauncherConfig::load_for_root(&root, cli.config.as_deref())?;
    let layout = config.layout(&root);
    info!(
        "launcher root {}, install dir {}, data dir {}",
        root.display(),
        layout.install_root().display(),
        layout.data_dir().display()
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        warn!("failed to install interrupt handler: {err}");
    }

    let mode = if cli.install_only {
        RunMode::InstallOnly
    } else {
        RunMode::RunForever
    };
    let mut steps = FilesystemSteps::new(layout, PipDependencyInstaller::new(&config.python));
    let mut supervisor = Supervisor::new(
        VenvFrameworkProcess::new(&config.python, &config.entry_script),
        Arc::clone(&interrupted),
    );

    match run_launcher(&mut steps, &mut supervisor, mode, &interrupted) {
        LauncherOutcome::InstallOnlyDone => info!("install finished, not starting framework"),
        LauncherOutcome::Stopped => info!("framework stopped"),
        LauncherOutcome::Interrupted => info!("launcher interrupted"),
        LauncherOutcome::NoRunnableVersion => warn!("launcher exiting without a runnable framework"),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
