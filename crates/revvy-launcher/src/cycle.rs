use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use revvy_core::Version;
use revvy_installer::{
    install_update_package, select_package, sweep_invalid_installations, validate_update_package,
    DependencyInstaller, InstallOutcome, LauncherLayout, SelectedPackage,
};
use tracing::{debug, info, warn};

use crate::supervisor::{ExitAction, FrameworkProcess, Supervisor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    InstallOnly,
    RunForever,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherOutcome {
    InstallOnlyDone,
    Stopped,
    NoRunnableVersion,
    Interrupted,
}

/// Filesystem side of one launcher cycle.
pub trait LauncherSteps {
    fn sweep(&mut self);
    fn has_update_package(&mut self) -> bool;
    fn install_update_package(&mut self) -> InstallOutcome;
    fn select(
        &mut self,
        skipped: &BTreeSet<PathBuf>,
        preferred: Option<&Version>,
    ) -> Option<SelectedPackage>;
}

pub struct FilesystemSteps<D> {
    layout: LauncherLayout,
    deps: D,
}

impl<D: DependencyInstaller> FilesystemSteps<D> {
    pub fn new(layout: LauncherLayout, deps: D) -> Self {
        Self { layout, deps }
    }
}

impl<D: DependencyInstaller> LauncherSteps for FilesystemSteps<D> {
    fn sweep(&mut self) {
        sweep_invalid_installations(&self.layout);
    }

    fn has_update_package(&mut self) -> bool {
        validate_update_package(&self.layout).is_valid()
    }

    fn install_update_package(&mut self) -> InstallOutcome {
        install_update_package(&self.layout, &mut self.deps)
    }

    fn select(
        &mut self,
        skipped: &BTreeSet<PathBuf>,
        preferred: Option<&Version>,
    ) -> Option<SelectedPackage> {
        select_package(&self.layout, skipped, preferred)
    }
}

/// Drives cleanup, update, selection and supervision until the framework
/// asks to stop, nothing is runnable, or `stop` is raised.
pub fn run_launcher<S, P>(
    steps: &mut S,
    supervisor: &mut Supervisor<P>,
    mode: RunMode,
    stop: &AtomicBool,
) -> LauncherOutcome
where
    S: LauncherSteps,
    P: FrameworkProcess,
{
    let mut skipped = BTreeSet::new();

    loop {
        if stop.load(Ordering::SeqCst) {
            return LauncherOutcome::Interrupted;
        }

        steps.sweep();

        let mut preferred = None;
        if steps.has_update_package() {
            if let InstallOutcome::Installed { version, .. } = steps.install_update_package() {
                preferred = Some(version);
            }
        }

        if mode == RunMode::InstallOnly {
            return LauncherOutcome::InstallOnlyDone;
        }

        if stop.load(Ordering::SeqCst) {
            return LauncherOutcome::Interrupted;
        }

        let Some(selected) = steps.select(&skipped, preferred.as_ref()) else {
            warn!("no runnable framework version found");
            return LauncherOutcome::NoRunnableVersion;
        };
        info!(
            "selected version {} at {}",
            selected.version,
            selected.path.display()
        );

        // `Supervisor::run` handles plain failures itself and never hands back
        // `RetrySame`.
        match supervisor.run(&selected.path) {
            ExitAction::StopOk => return LauncherOutcome::Stopped,
            ExitAction::SkipVersion => {
                warn!("skipping {} for the rest of this run", selected.path.display());
                skipped.insert(selected.path);
            }
            ExitAction::RestartCycle => {
                info!("update requested, restarting launcher cycle");
            }
            ExitAction::RetrySame => {
                debug!("retry reached the launcher loop, starting a new cycle");
            }
        }
    }
}
