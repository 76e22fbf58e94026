//! Engine version parsing
//!
//! The engine reports its version as a dotted string such as `"4.3.1"`.
//! Only the major component matters for locating modules, but the full
//! triple is exposed to callers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed engine version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string
    ///
    /// Accepts one to three unsigned integer components; missing trailing
    /// components are zero.
    ///
    /// # Errors
    /// Returns [`Error::Version`] for empty input, non-numeric components or
    /// more than three components.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Err(Error::Version(version.to_string()));
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for component in trimmed.split('.') {
            if count == parts.len() {
                return Err(Error::Version(version.to_string()));
            }
            parts[count] = component
                .parse()
                .map_err(|_| Error::Version(version.to_string()))?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Version as a `(major, minor, patch)` tuple
    #[must_use]
    pub const fn as_tuple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl FromStr for EngineVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
