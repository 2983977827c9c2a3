use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use revvy_core::{read_manifest_version, Version};
use tracing::{info, warn};

use crate::archive::extract_tar_gz;
use crate::deps::DependencyInstaller;
use crate::fs_utils::{
    discard_dir, discard_update_package, remove_dir_all_if_exists, remove_empty_dir,
    write_empty_file_synced,
};
use crate::LauncherLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { version: Version, path: PathBuf },
    AlreadyInstalled(Version),
    Aborted(String),
}

/// Installs the validated update package from the data directory.
///
/// Until the staged tree is renamed into place every failure leaves the
/// install root as it was. After that point only the sentinel decides
/// whether the new directory counts as installed. The package pair is
/// consumed on every path out of this function.
pub fn install_update_package<Deps>(layout: &LauncherLayout, deps: &mut Deps) -> InstallOutcome
where
    Deps: DependencyInstaller + ?Sized,
{
    let root_existed = layout.install_root().is_dir();
    let outcome = match stage_and_commit(layout) {
        Ok(Staged::Committed { version, path }) => finish_install(layout, deps, version, path),
        Ok(Staged::Duplicate(version)) => {
            info!("version {version} seems to be installed already, skipping");
            InstallOutcome::AlreadyInstalled(version)
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!("update package install aborted: {reason}");
            discard_dir(&layout.staging_path());
            if !root_existed {
                remove_empty_dir(layout.install_root());
            }
            InstallOutcome::Aborted(reason)
        }
    };

    info!("removing update package");
    discard_update_package(layout);
    outcome
}

enum Staged {
    Committed { version: Version, path: PathBuf },
    Duplicate(Version),
}

fn stage_and_commit(layout: &LauncherLayout) -> Result<Staged> {
    layout.ensure_install_root()?;

    let staging = layout.staging_path();
    if staging.exists() {
        info!("removing stuck staging dir: {}", staging.display());
        remove_dir_all_if_exists(&staging)
            .with_context(|| format!("failed to remove {}", staging.display()))?;
    }

    info!("extracting update package to {}", staging.display());
    extract_tar_gz(&layout.package_path(), &staging)?;

    info!("reading package version");
    let manifest_path = layout.manifest_path(&staging);
    let version = read_manifest_version(&manifest_path)?
        .ok_or_else(|| anyhow!("package has no manifest: {}", manifest_path.display()))?;

    let target = layout.version_dir(&version);
    if target.exists() {
        discard_dir(&staging);
        return Ok(Staged::Duplicate(version));
    }

    info!("installing version {version}");
    info!("renaming {} to {}", staging.display(), target.display());
    fs::rename(&staging, &target).with_context(|| {
        format!(
            "failed to move {} to {}",
            staging.display(),
            target.display()
        )
    })?;

    Ok(Staged::Committed {
        version,
        path: target,
    })
}

fn finish_install<Deps>(
    layout: &LauncherLayout,
    deps: &mut Deps,
    version: Version,
    path: PathBuf,
) -> InstallOutcome
where
    Deps: DependencyInstaller + ?Sized,
{
    info!("running setup for {}", path.display());
    if let Err(err) = deps.materialize(&path) {
        let reason = format!("{err:#}");
        warn!("dependency setup failed, leaving {} unsealed: {reason}", path.display());
        return InstallOutcome::Aborted(reason);
    }

    let sentinel = layout.sentinel_path(&path);
    if let Err(err) = write_empty_file_synced(&sentinel) {
        let reason = format!("{err:#}");
        warn!("failed to seal {}: {reason}", path.display());
        return InstallOutcome::Aborted(reason);
    }

    info!("installed version {version} to {}", path.display());
    InstallOutcome::Installed { version, path }
}
