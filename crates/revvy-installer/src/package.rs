use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use revvy_security::{digests_match, md5_file_hex, sha256_file_hex};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::fs_utils::discard_update_package;
use crate::LauncherLayout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub length: u64,
    pub md5: String,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl PackageMetadata {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse update package metadata")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    Absent,
    Invalid(String),
    Valid(PackageMetadata),
}

impl PackageStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Checks the update package in the data directory against its metadata.
///
/// Any package that is present but not genuine is deleted, so a corrupt pair
/// is never retried. A valid package is left in place for the installer.
pub fn validate_update_package(layout: &LauncherLayout) -> PackageStatus {
    let package_path = layout.package_path();
    let metadata_path = layout.metadata_path();
    info!("looking for update files in {}", layout.data_dir().display());

    if !package_path.is_file() || !metadata_path.is_file() {
        return PackageStatus::Absent;
    }

    info!("found update file, validating");
    match check_package(&package_path, &metadata_path) {
        Ok(metadata) => {
            info!("update package is valid ({} bytes)", metadata.length);
            PackageStatus::Valid(metadata)
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!("rejecting update package: {reason}");
            discard_update_package(layout);
            PackageStatus::Invalid(reason)
        }
    }
}

fn check_package(package_path: &Path, metadata_path: &Path) -> Result<PackageMetadata> {
    let raw = fs::read_to_string(metadata_path)
        .with_context(|| format!("failed to read {}", metadata_path.display()))?;
    let metadata = PackageMetadata::from_json_str(&raw)
        .with_context(|| format!("update metadata corrupted: {}", metadata_path.display()))?;

    let actual_length = fs::metadata(package_path)
        .with_context(|| format!("failed to stat {}", package_path.display()))?
        .len();
    if actual_length != metadata.length {
        return Err(anyhow!(
            "update file length mismatch: expected {} bytes, found {}",
            metadata.length,
            actual_length
        ));
    }

    let actual_md5 = md5_file_hex(package_path)?;
    if !digests_match(&actual_md5, &metadata.md5) {
        return Err(anyhow!(
            "update file md5 mismatch: expected {}, found {}",
            metadata.md5.trim(),
            actual_md5
        ));
    }

    if let Some(expected_sha256) = &metadata.sha256 {
        let actual_sha256 = sha256_file_hex(package_path)?;
        if !digests_match(&actual_sha256, expected_sha256) {
            return Err(anyhow!(
                "update file sha256 mismatch: expected {}, found {}",
                expected_sha256.trim(),
                actual_sha256
            ));
        }
    }

    Ok(metadata)
}
