//! Semantic version of the published manual

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key the current version is stored under
pub const VERSION_KEY: &str = "manual-version";

/// Common prefix of every published blob key
pub const BLOB_PREFIX: &str = "manual-v";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct VersionMeta {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpKind {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            _ => Err(PublishError::InvalidBump(s.to_string())),
        }
    }
}

impl VersionMeta {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The next version; lower components reset to zero. Fails when the
    /// bumped component is already at `u32::MAX`.
    pub fn bump(self, kind: BumpKind) -> Result<Self> {
        let next = |n: u32| {
            n.checked_add(1).ok_or_else(|| {
                PublishError::Config(format!("{} cannot take a {:?} bump", self, kind))
            })
        };
        Ok(match kind {
            BumpKind::Major => Self::new(next(self.major)?, 0, 0),
            BumpKind::Minor => Self::new(self.major, next(self.minor)?, 0),
            BumpKind::Patch => Self::new(self.major, self.minor, next(self.patch)?),
        })
    }

    /// Blob key of the PDF published under this version
    pub fn blob_key(&self) -> String {
        format!("{}{}.{}.{}.pdf", BLOB_PREFIX, self.major, self.minor, self.patch)
    }

    /// Parse a blob key back into its version
    pub fn from_blob_key(key: &str) -> Option<Self> {
        key.strip_prefix(BLOB_PREFIX)?
            .strip_suffix(".pdf")?
            .parse()
            .ok()
    }
}

/// `v{major}.{minor}.{patch}`
impl fmt::Display for VersionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Accepts `1.2.3` and `v1.2.3`
impl FromStr for VersionMeta {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let parts: Vec<&str> = digits.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(PublishError::Config(format!("Invalid version {:?}", s)));
        };
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| PublishError::Config(format!("Invalid version {:?}", s)))
        };
        Ok(Self::new(parse(*major)?, parse(*minor)?, parse(*patch)?))
    }
}
