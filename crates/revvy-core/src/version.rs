use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_DISPLAY_COMPONENTS: usize = 2;

/// Dotted framework version such as `1.10` or `2.0.3`.
///
/// Components compare lexicographically with missing trailing components
/// treated as zero. Trailing zeros past the minor component are dropped at
/// parse time, so `1.0`, `1.0.0` and `1.0-r0` are the same value and render
/// the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    components: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid version component '{component}' in '{input}'")]
    InvalidComponent { input: String, component: String },
    #[error("invalid revision suffix in '{input}'")]
    InvalidRevision { input: String },
}

impl Version {
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        let mut components = components.into();
        if components.len() < MIN_DISPLAY_COMPONENTS {
            components.resize(MIN_DISPLAY_COMPONENTS, 0);
        }
        while components.len() > MIN_DISPLAY_COMPONENTS && components.last() == Some(&0) {
            components.pop();
        }
        Self { components }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // Legacy `MAJOR.MINOR-rREV` packages carry the revision as a suffix.
        let (dotted, revision) = match trimmed.split_once("-r") {
            Some((dotted, revision)) => {
                let revision = parse_component(revision).ok_or_else(|| {
                    VersionParseError::InvalidRevision {
                        input: input.to_string(),
                    }
                })?;
                (dotted, Some(revision))
            }
            None => (trimmed, None),
        };

        let mut components = Vec::new();
        for component in dotted.split('.') {
            let value =
                parse_component(component).ok_or_else(|| VersionParseError::InvalidComponent {
                    input: input.to_string(),
                    component: component.to_string(),
                })?;
            components.push(value);
        }

        if let Some(revision) = revision {
            if components.len() < MIN_DISPLAY_COMPONENTS {
                components.resize(MIN_DISPLAY_COMPONENTS, 0);
            }
            components.push(revision);
        }

        Ok(Self::new(components))
    }
}

fn parse_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}
