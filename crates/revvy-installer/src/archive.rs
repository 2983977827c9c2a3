use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

/// Unpacks a gzip-compressed tarball into `dst`, creating it first.
///
/// Entries that would land outside `dst` are skipped by `tar` itself.
pub fn extract_tar_gz(archive_path: &Path, dst: &Path) -> Result<()> {
    debug!("extracting {} into {}", archive_path.display(), dst.display());
    fs::create_dir_all(dst).with_context(|| format!("failed to create {}", dst.display()))?;

    let file = File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    archive
        .unpack(dst)
        .with_context(|| format!("failed to extract archive: {}", archive_path.display()))
}
