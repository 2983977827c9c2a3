use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::version::Version;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameworkManifest {
    pub version: Version,
}

impl FrameworkManifest {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse framework manifest")
    }
}

/// Reads the `version` field of a JSON manifest.
///
/// A missing file is `Ok(None)`; unreadable or malformed content is an error
/// the caller is expected to downgrade.
pub fn read_manifest_version(path: &Path) -> Result<Option<Version>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read manifest: {}", path.display()));
        }
    };

    let manifest = FrameworkManifest::from_json_str(&raw)
        .with_context(|| format!("failed parsing manifest: {}", path.display()))?;
    Ok(Some(manifest.version))
}
