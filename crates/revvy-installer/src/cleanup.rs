use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::fs_utils::remove_dir_all_if_exists;
use crate::LauncherLayout;

/// Removes every directory in the install root that lacks the completion
/// sentinel and returns the directories it removed.
pub fn sweep_invalid_installations(layout: &LauncherLayout) -> Vec<PathBuf> {
    let root = layout.install_root();
    info!("cleaning up invalid installations in {}", root.display());

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!("failed to read install root {}: {}", root.display(), err);
            return Vec::new();
        }
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to read entry in {}: {}", root.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        debug!("checking {}", path.display());
        if layout.is_sealed(&path) {
            continue;
        }

        info!("removing {}", path.display());
        match remove_dir_all_if_exists(&path) {
            Ok(()) => removed.push(path),
            Err(err) => warn!("failed to remove {}: {}", path.display(), err),
        }
    }

    removed
}
