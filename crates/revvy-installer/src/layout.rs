use anyhow::{Context, Result};
use revvy_core::Version;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PACKAGE_FILE: &str = "2.data";
pub const DEFAULT_METADATA_FILE: &str = "2.meta";
pub const DEFAULT_DIR_PREFIX: &str = "revvy-";
pub const DEFAULT_STAGING_DIR: &str = "tmp";
pub const DEFAULT_SENTINEL_FILE: &str = "installed";
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherLayout {
    install_root: PathBuf,
    data_dir: PathBuf,
    package_file: String,
    metadata_file: String,
    dir_prefix: String,
    staging_dir: String,
    sentinel_file: String,
    manifest_file: String,
}

impl LauncherLayout {
    pub fn new(install_root: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            data_dir: data_dir.into(),
            package_file: DEFAULT_PACKAGE_FILE.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            dir_prefix: DEFAULT_DIR_PREFIX.to_string(),
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            sentinel_file: DEFAULT_SENTINEL_FILE.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }

    pub fn with_package_files(
        mut self,
        package_file: impl Into<String>,
        metadata_file: impl Into<String>,
    ) -> Self {
        self.package_file = package_file.into();
        self.metadata_file = metadata_file.into();
        self
    }

    pub fn with_dir_prefix(mut self, dir_prefix: impl Into<String>) -> Self {
        self.dir_prefix = dir_prefix.into();
        self
    }

    pub fn with_staging_dir(mut self, staging_dir: impl Into<String>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    pub fn with_sentinel_file(mut self, sentinel_file: impl Into<String>) -> Self {
        self.sentinel_file = sentinel_file.into();
        self
    }

    pub fn with_manifest_file(mut self, manifest_file: impl Into<String>) -> Self {
        self.manifest_file = manifest_file.into();
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn package_path(&self) -> PathBuf {
        self.data_dir.join(&self.package_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.install_root.join(&self.staging_dir)
    }

    pub fn version_dir_name(&self, version: &Version) -> String {
        format!("{}{}", self.dir_prefix, version)
    }

    pub fn version_dir(&self, version: &Version) -> PathBuf {
        self.install_root.join(self.version_dir_name(version))
    }

    pub fn sentinel_path(&self, package_dir: &Path) -> PathBuf {
        package_dir.join(&self.sentinel_file)
    }

    pub fn manifest_path(&self, package_dir: &Path) -> PathBuf {
        package_dir.join(&self.manifest_file)
    }

    pub fn is_sealed(&self, package_dir: &Path) -> bool {
        self.sentinel_path(package_dir).is_file()
    }

    pub fn ensure_install_root(&self) -> Result<()> {
        fs::create_dir_all(&self.install_root)
            .with_context(|| format!("failed to create {}", self.install_root.display()))
    }
}
