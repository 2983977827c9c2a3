use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use revvy_installer::{stream_command_output, PipDependencyInstaller};
use tracing::{error, info, warn};

/// What the launcher does after the framework process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    /// Exit code 0: the operator asked the device to stop.
    StopOk,
    /// Exit code 1: generic failure, start the same package again.
    RetrySame,
    /// Exit code 2: the package reported an integrity problem.
    SkipVersion,
    /// Anything else, including death by signal: treated as an update request.
    RestartCycle,
}

impl ExitAction {
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::StopOk,
            Some(1) => Self::RetrySame,
            Some(2) => Self::SkipVersion,
            _ => Self::RestartCycle,
        }
    }
}

/// Runs one framework process to completion and returns its exit code,
/// `None` when it was killed by a signal.
pub trait FrameworkProcess {
    fn run(&mut self, package_dir: &Path) -> Result<Option<i32>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvFrameworkProcess {
    python: PathBuf,
    entry_script: String,
}

impl VenvFrameworkProcess {
    pub fn new(python: impl Into<PathBuf>, entry_script: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            entry_script: entry_script.into(),
        }
    }

    pub(crate) fn build_command(&self, package_dir: &Path) -> Command {
        let venv_python = PipDependencyInstaller::venv_python(package_dir);
        let interpreter = if venv_python.is_file() {
            venv_python
        } else {
            warn!(
                "no virtualenv interpreter in {}, falling back to {}",
                package_dir.display(),
                self.python.display()
            );
            self.python.clone()
        };

        let mut command = Command::new(interpreter);
        command
            .arg("-u")
            .arg(package_dir.join(&self.entry_script))
            .current_dir(package_dir);
        command
    }
}

impl FrameworkProcess for VenvFrameworkProcess {
    fn run(&mut self, package_dir: &Path) -> Result<Option<i32>> {
        let status = stream_command_output(&mut self.build_command(package_dir))
            .with_context(|| format!("failed to start framework in {}", package_dir.display()))?;
        Ok(status.code())
    }
}

pub struct Supervisor<P> {
    process: P,
    interrupted: Arc<AtomicBool>,
}

impl<P: FrameworkProcess> Supervisor<P> {
    pub fn new(process: P, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            process,
            interrupted,
        }
    }

    /// Runs the package until it exits with something other than a plain
    /// failure. Never returns [`ExitAction::RetrySame`].
    pub fn run(&mut self, package_dir: &Path) -> ExitAction {
        loop {
            let action = self.run_once(package_dir);
            if action != ExitAction::RetrySame {
                return action;
            }
            info!("restarting {}", package_dir.display());
        }
    }

    pub fn run_once(&mut self, package_dir: &Path) -> ExitAction {
        if self.interrupted.load(Ordering::SeqCst) {
            info!("launcher interrupted, not starting {}", package_dir.display());
            return ExitAction::StopOk;
        }

        info!("starting {}", package_dir.display());
        let code = match self.process.run(package_dir) {
            Ok(code) => code,
            Err(err) => {
                error!("{err:#}");
                return ExitAction::SkipVersion;
            }
        };

        if self.interrupted.load(Ordering::SeqCst) {
            info!("launcher interrupted, framework exited with {code:?}");
            return ExitAction::StopOk;
        }

        match code {
            Some(code) => info!("script exited with {code}"),
            None => info!("script was terminated by a signal"),
        }
        ExitAction::from_exit_code(code)
    }
}
