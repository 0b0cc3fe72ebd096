//! Configuration types for the Microsoft Graph SDK.
//!
//! This module provides the core configuration types used to initialize
//! and configure the SDK for API communication with Microsoft Graph.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GraphConfig`]: The main configuration struct holding all SDK settings
//! - [`GraphConfigBuilder`]: A builder for constructing [`GraphConfig`] instances
//! - [`TenantId`]: A validated directory (tenant) identifier
//! - [`ClientId`] / [`ClientSecret`]: Application credentials
//! - [`EndpointUrl`]: A validated service endpoint
//! - [`ApiVersion`]: The Graph API version to use
//!
//! # Example
//!
//! ```rust
//! use msgraph_api::{GraphConfig, TenantId, ApiVersion};
//!
//! let config = GraphConfig::builder()
//!     .tenant_id(TenantId::new("contoso.onmicrosoft.com").unwrap())
//!     .api_version(ApiVersion::Beta)
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;
mod version;

pub use newtypes::{ClientId, ClientSecret, EndpointUrl, TenantId};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Default number of extra attempts made when a consistency failure is detected.
pub const DEFAULT_CONSISTENCY_RETRIES: u32 = 5;

/// Default delay between consistency retries.
pub const DEFAULT_CONSISTENCY_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Configuration for the Microsoft Graph SDK.
///
/// # Thread Safety
///
/// `GraphConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use msgraph_api::{GraphConfig, TenantId, EndpointUrl};
///
/// let config = GraphConfig::builder()
///     .tenant_id(TenantId::new("contoso").unwrap())
///     .endpoint(EndpointUrl::new("https://graph.microsoft.us").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.endpoint().as_ref(), "https://graph.microsoft.us");
/// ```
#[derive(Clone, Debug)]
pub struct GraphConfig {
    tenant_id: TenantId,
    api_version: ApiVersion,
    endpoint: EndpointUrl,
    authority: EndpointUrl,
    user_agent_prefix: Option<String>,
    tries: u32,
    consistency_retries: u32,
    consistency_retry_delay: Duration,
}

impl GraphConfig {
    /// Creates a new builder for constructing a `GraphConfig`.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::new()
    }

    /// Returns the tenant ID every tenant-scoped request is bound to.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the default API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the Graph resource endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the identity platform authority used for token requests.
    #[must_use]
    pub const fn authority(&self) -> &EndpointUrl {
        &self.authority
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns how many times a request is attempted on 429/5xx responses.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Returns how many extra attempts are made after a consistency failure.
    #[must_use]
    pub const fn consistency_retries(&self) -> u32 {
        self.consistency_retries
    }

    /// Returns the delay between consistency retries.
    #[must_use]
    pub const fn consistency_retry_delay(&self) -> Duration {
        self.consistency_retry_delay
    }
}

// Verify GraphConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphConfig>();
};

/// Builder for constructing [`GraphConfig`] instances.
///
/// Only the tenant ID is required. Everything else falls back to the global
/// cloud with the stable API version.
#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    tenant_id: Option<TenantId>,
    api_version: Option<ApiVersion>,
    endpoint: Option<EndpointUrl>,
    authority: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    tries: Option<u32>,
    consistency_retries: Option<u32>,
    consistency_retry_delay: Option<Duration>,
}

impl GraphConfigBuilder {
    /// Creates a new builder with all fields unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant ID (required).
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Sets the default API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the Graph resource endpoint (national clouds, test servers).
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the identity platform authority.
    #[must_use]
    pub fn authority(mut self, authority: EndpointUrl) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Sets a prefix prepended to the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets how many times a request is attempted on 429/5xx responses.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Sets how many extra attempts are made after a consistency failure.
    #[must_use]
    pub const fn consistency_retries(mut self, retries: u32) -> Self {
        self.consistency_retries = Some(retries);
        self
    }

    /// Sets the delay between consistency retries.
    #[must_use]
    pub const fn consistency_retry_delay(mut self, delay: Duration) -> Self {
        self.consistency_retry_delay = Some(delay);
        self
    }

    /// Builds the [`GraphConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if the tenant ID is unset.
    pub fn build(self) -> Result<GraphConfig, ConfigError> {
        let tenant_id = self
            .tenant_id
            .ok_or(ConfigError::MissingRequiredField { field: "tenant_id" })?;

        Ok(GraphConfig {
            tenant_id,
            api_version: self.api_version.unwrap_or_default(),
            endpoint: self.endpoint.unwrap_or_else(EndpointUrl::graph_global),
            authority: self.authority.unwrap_or_else(EndpointUrl::login_global),
            user_agent_prefix: self.user_agent_prefix,
            tries: self.tries.unwrap_or(1).max(1),
            consistency_retries: self
                .consistency_retries
                .unwrap_or(DEFAULT_CONSISTENCY_RETRIES),
            consistency_retry_delay: self
                .consistency_retry_delay
                .unwrap_or(DEFAULT_CONSISTENCY_RETRY_DELAY),
        })
    }
}
