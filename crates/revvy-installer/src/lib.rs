mod archive;
mod cleanup;
mod deps;
mod fs_utils;
mod install;
mod layout;
mod package;
mod select;

pub use archive::extract_tar_gz;
pub use cleanup::sweep_invalid_installations;
pub use deps::{stream_command_output, DependencyInstaller, PipDependencyInstaller};
pub use install::{install_update_package, InstallOutcome};
pub use layout::LauncherLayout;
pub use package::{validate_update_package, PackageMetadata, PackageStatus};
pub use select::{read_installed_version, select_newest_package, select_package, SelectedPackage};
