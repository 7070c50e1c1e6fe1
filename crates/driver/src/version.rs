//! Storage driver interface versioning.

use std::fmt;
use std::str::FromStr;

/// A storage driver interface version of the form `major.minor`.
///
/// The registry accepts drivers with an equal major version and a minor
/// version at least as new as its own, but may not be compatible with older
/// drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
}

/// The storage driver interface version implemented by this crate.
pub const CURRENT_VERSION: Version = Version { major: 0, minor: 1 };

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The major (primary) component.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// The minor (secondary) component.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Whether a driver reporting `candidate` is acceptable to a registry
    /// at this version: equal major, candidate minor at least ours.
    pub fn accepts(&self, candidate: Version) -> bool {
        self.major == candidate.major && candidate.minor >= self.minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = crate::DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| crate::DriverError::InvalidParameter(format!("version: {s}")))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| crate::DriverError::InvalidParameter(format!("version: {s}")))
        };
        Ok(Self {
            major: parse(major)?,
            minor: parse(minor)?,
        })
    }
}
