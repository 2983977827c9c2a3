use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::info;

/// Materializes the runtime dependencies of a freshly committed package.
pub trait DependencyInstaller {
    fn materialize(&mut self, package_dir: &Path) -> Result<()>;
}

/// Builds a virtualenv under `install/venv` and installs the bundled wheels
/// from `install/packages` without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipDependencyInstaller {
    python: PathBuf,
}

impl PipDependencyInstaller {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn venv_dir(package_dir: &Path) -> PathBuf {
        package_dir.join("install").join("venv")
    }

    pub fn venv_python(package_dir: &Path) -> PathBuf {
        Self::venv_dir(package_dir).join("bin").join("python")
    }

    pub(crate) fn build_venv_command(&self, package_dir: &Path) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg("-m")
            .arg("venv")
            .arg(Self::venv_dir(package_dir))
            .current_dir(package_dir);
        command
    }

    pub(crate) fn build_pip_install_command(&self, package_dir: &Path) -> Command {
        let install_dir = package_dir.join("install");
        let mut command = Command::new(Self::venv_python(package_dir));
        command
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("-r")
            .arg(install_dir.join("requirements.txt"))
            .arg("--no-index")
            .arg("--find-links")
            .arg(install_dir.join("packages"))
            .current_dir(package_dir);
        command
    }
}

impl DependencyInstaller for PipDependencyInstaller {
    fn materialize(&mut self, package_dir: &Path) -> Result<()> {
        info!("setting up venv");
        run_streamed(
            &mut self.build_venv_command(package_dir),
            "failed to create virtualenv",
        )?;

        info!("installing dependencies");
        run_streamed(
            &mut self.build_pip_install_command(package_dir),
            "failed to install dependencies",
        )
    }
}

fn run_streamed(command: &mut Command, context_message: &str) -> Result<()> {
    let status = stream_command_output(command)
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if status.success() {
        return Ok(());
    }
    Err(anyhow!("{context_message}: status={status}"))
}

/// Runs `command` to completion, copying its stdout to ours one line at a time.
///
/// Stderr is inherited. Write errors on our side are ignored so a closed
/// terminal never kills the child mid-run.
pub fn stream_command_output(command: &mut Command) -> io::Result<ExitStatus> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let mut out = io::stdout().lock();
                    let _ = out.write_all(&line);
                    let _ = out.flush();
                }
                Err(_) => break,
            }
        }
    }

    child.wait()
}
