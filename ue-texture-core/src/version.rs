//! Engine version handling
//!
//! Cooked texture data carries no version marker of its own, so callers declare
//! the engine version the asset was cooked with. Versions compare by
//! `(major, minor)`; engine forks are tagged and keep the version of the
//! upstream release they branched from.

use crate::error::{Result, UeAssetError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.\d+)?$").expect("valid version regex"));

/// Engine forks with a texture layout of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EngineFork {
    /// Final Fantasy VII Remake, branched from 4.18
    Ff7r,
}

impl EngineFork {
    /// Tag used in version strings
    pub fn tag(&self) -> &'static str {
        match self {
            EngineFork::Ff7r => "ff7r",
        }
    }
}

/// Declared engine version of a cooked asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EngineVersion {
    pub major: u16,
    pub minor: u16,
    pub fork: Option<EngineFork>,
}

impl EngineVersion {
    /// The `ff7r` fork
    pub const FF7R: EngineVersion = EngineVersion {
        major: 4,
        minor: 18,
        fork: Some(EngineFork::Ff7r),
    };

    /// Create an upstream engine version
    pub const fn new(major: u16, minor: u16) -> Self {
        Self {
            major,
            minor,
            fork: None,
        }
    }

    /// Parse a version string such as `"4.27"`, `"5.0"`, `"4.26.2"` or `"ff7r"`
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        if trimmed.eq_ignore_ascii_case(EngineFork::Ff7r.tag()) {
            return Ok(Self::FF7R);
        }

        let captures = VERSION_REGEX
            .captures(trimmed)
            .ok_or_else(|| UeAssetError::invalid_version(version))?;
        let major = captures[1]
            .parse::<u16>()
            .map_err(|_| UeAssetError::invalid_version(version))?;
        let minor = captures[2]
            .parse::<u16>()
            .map_err(|_| UeAssetError::invalid_version(version))?;

        Ok(Self::new(major, minor))
    }

    /// Check if this is a tagged fork rather than an upstream release
    pub fn is_fork(&self) -> bool {
        self.fork.is_some()
    }

    /// Check if this version is at least the given upstream release
    ///
    /// Forks compare by the release they branched from.
    pub fn at_least(&self, major: u16, minor: u16) -> bool {
        (self.major, self.minor) >= (major, minor)
    }

    /// Check if this version is older than the given upstream release
    pub fn older_than(&self, major: u16, minor: u16) -> bool {
        !self.at_least(major, minor)
    }
}

impl Default for EngineVersion {
    fn default() -> Self {
        Self::new(4, 27)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fork {
            Some(fork) => write!(f, "{}", fork.tag()),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for EngineVersion {
    type Err = UeAssetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EngineVersion {
    type Error = UeAssetError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<EngineVersion> for String {
    fn from(version: EngineVersion) -> Self {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let version = EngineVersion::parse("4.27").unwrap();
        assert_eq!(version, EngineVersion::new(4, 27));

        let version = EngineVersion::parse("5.1.1").unwrap();
        assert_eq!(version, EngineVersion::new(5, 1));

        let version = EngineVersion::parse("FF7R").unwrap();
        assert_eq!(version, EngineVersion::FF7R);
        assert!(version.is_fork());
    }

    #[test]
    fn test_invalid_versions() {
        assert!(EngineVersion::parse("").is_err());
        assert!(EngineVersion::parse("4").is_err());
        assert!(EngineVersion::parse("four.two").is_err());
        assert!(EngineVersion::parse("4.27-preview").is_err());
    }

    #[test]
    fn test_version_comparison() {
        let v420 = EngineVersion::new(4, 20);
        let v426 = EngineVersion::new(4, 26);
        let v50 = EngineVersion::new(5, 0);

        assert!(v420 < v426);
        assert!(v426 < v50);
        assert!(v50.at_least(4, 23));
        assert!(v420.older_than(4, 23));
    }

    #[test]
    fn test_fork_compares_as_base_release() {
        let fork = EngineVersion::FF7R;
        assert!(fork.at_least(4, 18));
        assert!(!fork.at_least(4, 20));
        assert!(fork.older_than(4, 23));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(EngineVersion::new(4, 26).to_string(), "4.26");
        assert_eq!(EngineVersion::FF7R.to_string(), "ff7r");
        assert_eq!(
            "4.26".parse::<EngineVersion>().unwrap().to_string(),
            "4.26"
        );
    }
}
