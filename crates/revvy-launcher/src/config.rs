use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use revvy_installer::LauncherLayout;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "launcher.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub install_dir: PathBuf,
    pub data_dir: PathBuf,
    pub package_file: String,
    pub metadata_file: String,
    pub dir_prefix: String,
    pub staging_dir: String,
    pub sentinel_file: String,
    pub manifest_file: String,
    pub python: PathBuf,
    pub entry_script: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("installed"),
            data_dir: PathBuf::from("data").join("ble"),
            package_file: "2.data".to_string(),
            metadata_file: "2.meta".to_string(),
            dir_prefix: "revvy-".to_string(),
            staging_dir: "tmp".to_string(),
            sentinel_file: "installed".to_string(),
            manifest_file: "manifest.json".to_string(),
            python: PathBuf::from("python3"),
            entry_script: "revvy.py".to_string(),
        }
    }
}

impl LauncherConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse launcher config")?;
        for (field, value) in [
            ("package_file", &config.package_file),
            ("metadata_file", &config.metadata_file),
            ("staging_dir", &config.staging_dir),
            ("sentinel_file", &config.sentinel_file),
            ("manifest_file", &config.manifest_file),
            ("entry_script", &config.entry_script),
        ] {
            validate_file_name(field, value)?;
        }
        if config.package_file == config.metadata_file {
            return Err(anyhow!(
                "package_file and metadata_file must differ: '{}'",
                config.package_file
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read launcher config: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid launcher config: {}", path.display()))
    }

    /// Loads `explicit` when given, otherwise `<root>/launcher.toml` if it
    /// exists, otherwise the built-in defaults.
    pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = root.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(&default_path);
        }
        Ok(Self::default())
    }

    pub fn layout(&self, root: &Path) -> LauncherLayout {
        LauncherLayout::new(
            resolve_under(root, &self.install_dir),
            resolve_under(root, &self.data_dir),
        )
        .with_package_files(&self.package_file, &self.metadata_file)
        .with_dir_prefix(&self.dir_prefix)
        .with_staging_dir(&self.staging_dir)
        .with_sentinel_file(&self.sentinel_file)
        .with_manifest_file(&self.manifest_file)
    }
}

/// Directory holding the launcher executable, mirroring how the device image
/// lays the launcher next to its `installed/` and `data/` trees.
pub fn default_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve launcher executable path")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("launcher executable has no parent: {}", exe.display()))
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn validate_file_name(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{field} must not be empty"));
    }
    if trimmed != value || value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(anyhow!("{field} must be a plain file name: '{value}'"));
    }
    Ok(())
}
