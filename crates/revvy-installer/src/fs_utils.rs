use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::LauncherLayout;

pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

pub fn remove_dir_all_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Deletes both halves of the update package, logging failures.
pub fn discard_update_package(layout: &LauncherLayout) {
    for path in [layout.package_path(), layout.metadata_path()] {
        if let Err(err) = remove_file_if_exists(&path) {
            warn!("failed to remove {}: {}", path.display(), err);
        }
    }
}

pub fn discard_dir(path: &Path) {
    if let Err(err) = remove_dir_all_if_exists(path) {
        warn!("failed to remove {}: {}", path.display(), err);
    }
}

/// Removes `path` only if it is an empty directory.
pub fn remove_empty_dir(path: &Path) {
    match fs::remove_dir(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => debug!("left {} in place: {}", path.display(), err),
    }
}

pub fn write_empty_file_synced(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync {} to disk", path.display()))
}
