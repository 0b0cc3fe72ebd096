//! Microsoft Graph API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the Graph API to use.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Microsoft Graph API version.
///
/// Graph exposes a stable `v1.0` surface and a `beta` surface. Some
/// directory resources, including conditional access policies in their full
/// shape, are only available on `beta`.
///
/// # Example
///
/// ```rust
/// use msgraph_api::ApiVersion;
///
/// let version: ApiVersion = "beta".parse().unwrap();
/// assert_eq!(version, ApiVersion::Beta);
/// assert_eq!(format!("{}", ApiVersion::V1_0), "v1.0");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    /// The generally available `v1.0` API.
    #[default]
    V1_0,
    /// The `beta` API. Subject to change without notice.
    Beta,
}

impl ApiVersion {
    /// Returns the stable API version.
    #[must_use]
    pub const fn stable() -> Self {
        Self::V1_0
    }

    /// Returns `true` for the generally available version.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::V1_0)
    }

    /// Returns the path segment used in request URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1_0 => "v1.0",
            Self::Beta => "beta",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "v1.0" | "1.0" => Ok(Self::V1_0),
            "beta" => Ok(Self::Beta),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_versions() {
        assert_eq!("v1.0".parse::<ApiVersion>().unwrap(), ApiVersion::V1_0);
        assert_eq!("1.0".parse::<ApiVersion>().unwrap(), ApiVersion::V1_0);
        assert_eq!(" Beta ".parse::<ApiVersion>().unwrap(), ApiVersion::Beta);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let result = "v2.0".parse::<ApiVersion>();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidApiVersion { version }) if version == "v2.0"
        ));
    }

    #[test]
    fn test_display_matches_url_segment() {
        assert_eq!(ApiVersion::V1_0.to_string(), "v1.0");
        assert_eq!(ApiVersion::Beta.to_string(), "beta");
    }

    #[test]
    fn test_default_is_stable() {
        assert_eq!(ApiVersion::default(), ApiVersion::stable());
        assert!(ApiVersion::V1_0.is_stable());
        assert!(!ApiVersion::Beta.is_stable());
    }
}
