//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated directory (tenant) identifier.
///
/// Accepts either a tenant GUID or a verified domain name. Since the value is
/// spliced into request paths, only ASCII alphanumerics, `-`, `.` and `_` are
/// allowed.
///
/// # Serialization
///
/// `TenantId` serializes to and deserializes from a plain string:
///
/// ```rust
/// use msgraph_api::TenantId;
///
/// let tenant = TenantId::new("contoso.onmicrosoft.com").unwrap();
/// let json = serde_json::to_string(&tenant).unwrap();
/// assert_eq!(json, r#""contoso.onmicrosoft.com""#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new validated tenant ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyTenantId`] if the value is empty, or
    /// [`ConfigError::InvalidTenantId`] if it contains disallowed characters.
    pub fn new(tenant_id: impl Into<String>) -> Result<Self, ConfigError> {
        let tenant_id = tenant_id.into().trim().to_string();
        if tenant_id.is_empty() {
            return Err(ConfigError::EmptyTenantId);
        }
        let valid = tenant_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
        if !valid {
            return Err(ConfigError::InvalidTenantId { tenant_id });
        }
        Ok(Self(tenant_id))
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TenantId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TenantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated application (client) ID.
///
/// # Example
///
/// ```rust
/// use msgraph_api::ClientId;
///
/// let id = ClientId::new("00000000-0000-0000-0000-000000000000").unwrap();
/// assert_eq!(id.as_ref(), "00000000-0000-0000-0000-000000000000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated client secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)`.
///
/// # Example
///
/// ```rust
/// use msgraph_api::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated service endpoint URL, such as the Graph resource endpoint or
/// the identity platform authority.
///
/// Trailing slashes are stripped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use msgraph_api::EndpointUrl;
///
/// let url = EndpointUrl::new("https://graph.microsoft.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://graph.microsoft.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("graph.microsoft.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl EndpointUrl {
    /// Global Microsoft Graph endpoint.
    pub const GRAPH_GLOBAL: &'static str = "https://graph.microsoft.com";

    /// Global identity platform authority.
    pub const LOGIN_GLOBAL: &'static str = "https://login.microsoftonline.com";

    /// Creates a new validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidEndpointUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidEndpointUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidEndpointUrl { url: url.clone() });
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidEndpointUrl { url: url.clone() });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// The global Microsoft Graph endpoint.
    #[must_use]
    pub fn graph_global() -> Self {
        Self::from_static(Self::GRAPH_GLOBAL)
    }

    /// The global identity platform authority.
    #[must_use]
    pub fn login_global() -> Self {
        Self::from_static(Self::LOGIN_GLOBAL)
    }

    fn from_static(url: &'static str) -> Self {
        let scheme_end = url.find("://").unwrap_or_default();
        Self {
            url: url.to_string(),
            scheme_end,
            host_start: scheme_end + 3,
            host_end: url.len(),
        }
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
