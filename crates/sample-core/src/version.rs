//! API version selection.
//!
//! The Sample API is versioned through the `X-OpenStack-Sample-API-Version`
//! header. Clients either pin a version explicitly or fall back to
//! [`DEFAULT_API_VERSION`]; which of the two happened is recorded as a
//! [`VersionSelectState`] because servers may treat an explicit opt-in
//! differently from the client's default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Header carrying the requested API version.
pub const API_VERSION_HEADER: &str = "X-OpenStack-Sample-API-Version";

/// Version requested when the caller does not pick one.
pub const DEFAULT_API_VERSION: &str = "1.1";

/// A requested API version: either `major.minor` or the literal `latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// A concrete `major.minor` version
    Version {
        /// Major version
        major: u16,
        /// Minor version
        minor: u16,
    },
    /// Ask the server for the newest version it supports
    Latest,
}

impl ApiVersion {
    /// The version used when none is supplied.
    #[must_use]
    pub fn default_version() -> Self {
        // DEFAULT_API_VERSION is a literal kept in sync with this fallback.
        DEFAULT_API_VERSION
            .parse()
            .unwrap_or(Self::Version { major: 1, minor: 1 })
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }

        let invalid = || {
            Error::ConfigError(format!(
                "Invalid API version `{s}`: expected `<major>.<minor>` or `latest`"
            ))
        };

        let (major, minor) = trimmed.split_once('.').ok_or_else(invalid)?;
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self::Version { major, minor })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version { major, minor } => write!(f, "{major}.{minor}"),
            Self::Latest => f.write_str("latest"),
        }
    }
}

/// How the API version in use was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSelectState {
    /// No version was supplied; [`DEFAULT_API_VERSION`] is in use.
    Default,
    /// The caller supplied the version explicitly.
    User,
}

impl VersionSelectState {
    /// Returns the state as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::User => "user",
        }
    }
}

impl fmt::Display for VersionSelectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an optional user-supplied version into the version to send and its provenance.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the supplied version cannot be parsed.
pub fn select_version(requested: Option<&str>) -> Result<(ApiVersion, VersionSelectState)> {
    match requested.map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => Ok((version.parse()?, VersionSelectState::User)),
        None => Ok((ApiVersion::default_version(), VersionSelectState::Default)),
    }
}
