use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use revvy_core::{read_manifest_version, Version};
use tracing::{debug, info, warn};

use crate::LauncherLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPackage {
    pub path: PathBuf,
    pub version: Version,
}

/// Version of a sealed package directory, or `None` if it is unsealed or its
/// manifest cannot be read.
pub fn read_installed_version(layout: &LauncherLayout, package_dir: &Path) -> Option<Version> {
    if !layout.is_sealed(package_dir) {
        debug!("skipping unsealed {}", package_dir.display());
        return None;
    }

    match read_manifest_version(&layout.manifest_path(package_dir)) {
        Ok(Some(version)) => Some(version),
        Ok(None) => {
            debug!("no manifest in {}", package_dir.display());
            None
        }
        Err(err) => {
            warn!("ignoring {}: {err:#}", package_dir.display());
            None
        }
    }
}

pub fn select_newest_package(
    layout: &LauncherLayout,
    skipped: &BTreeSet<PathBuf>,
) -> Option<SelectedPackage> {
    let root = layout.install_root();
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("cannot list install root {}: {}", root.display(), err);
            return None;
        }
    };

    let mut newest: Option<SelectedPackage> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() || skipped.contains(&path) {
            continue;
        }
        let Some(version) = read_installed_version(layout, &path) else {
            continue;
        };

        let is_newer = match &newest {
            Some(current) => version > current.version,
            None => true,
        };
        if is_newer {
            info!("found version {version}");
            newest = Some(SelectedPackage { path, version });
        }
    }

    newest
}

/// Picks `preferred` when it is installed, sealed and not skipped, and falls
/// back to the newest runnable package otherwise.
pub fn select_package(
    layout: &LauncherLayout,
    skipped: &BTreeSet<PathBuf>,
    preferred: Option<&Version>,
) -> Option<SelectedPackage> {
    if let Some(preferred) = preferred {
        let path = layout.version_dir(preferred);
        if !skipped.contains(&path) {
            if let Some(version) = read_installed_version(layout, &path) {
                if &version == preferred {
                    info!("selecting freshly installed version {version}");
                    return Some(SelectedPackage { path, version });
                }
            }
        }
    }

    select_newest_package(layout, skipped)
}
