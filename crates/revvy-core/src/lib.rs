mod manifest;
mod version;

pub use manifest::{read_manifest_version, FrameworkManifest};
pub use version::{Version, VersionParseError};
