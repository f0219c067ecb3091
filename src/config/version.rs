//! Dashboard config version handling.
//!
//! Config files carry a two-component `MAJOR.MINOR` version string. Versions
//! order by (major, minor); the pipeline accepts anything between
//! [`MINIMAL_VERSION`] and [`CURRENT_VERSION`] inclusive and gates individual
//! tile types and parameter fields on their own minimums.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Oldest config version the pipeline still accepts.
pub const MINIMAL_VERSION: ConfigVersion = ConfigVersion::new(1, 0);

/// Config version written by the current release.
pub const CURRENT_VERSION: ConfigVersion = ConfigVersion::new(2, 0);

/// Marker used by the loader to recognise version format failures inside a
/// serde decode error.
pub(crate) const VERSION_FORMAT_MARKER: &str = "invalid config version";

/// A `MAJOR.MINOR` config version with a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigVersion {
    major: u64,
    minor: u64,
}

impl ConfigVersion {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Whether this version falls inside the supported range.
    pub fn is_supported(&self) -> bool {
        (MINIMAL_VERSION..=CURRENT_VERSION).contains(self)
    }

    /// The range hint rendered into `expected` fields of version errors.
    pub fn supported_range_hint() -> String {
        format!("\"{MINIMAL_VERSION}\" <= version <= \"{CURRENT_VERSION}\"")
    }
}

#[derive(Debug, Error)]
#[error("{VERSION_FORMAT_MARKER} {0:?}")]
pub struct VersionFormatError(pub String);

impl FromStr for ConfigVersion {
    type Err = VersionFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| VersionFormatError(s.to_string()))?;
        let major = major
            .parse::<u64>()
            .map_err(|_| VersionFormatError(s.to_string()))?;
        let minor = minor
            .parse::<u64>()
            .map_err(|_| VersionFormatError(s.to_string()))?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for ConfigVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ConfigVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
