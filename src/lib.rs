//! # Microsoft Graph API Rust SDK
//!
//! A Rust SDK for Microsoft Graph directory endpoints, providing type-safe
//! configuration, app-only authentication and resource clients built on a
//! shared HTTP base client.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`GraphConfig`] and [`GraphConfigBuilder`]
//! - Validated newtypes for tenant IDs, client credentials and endpoints
//! - OAuth 2.0 client credentials grant via [`auth::acquire_token`]
//! - OData query options and error decoding via [`odata`]
//! - Async HTTP client with transient and eventual-consistency retries
//! - Resource clients, starting with conditional access policies
//!
//! ## Quick Start
//!
//! ```rust
//! use msgraph_api::{GraphConfig, TenantId, ApiVersion};
//!
//! let config = GraphConfig::builder()
//!     .tenant_id(TenantId::new("contoso.onmicrosoft.com").unwrap())
//!     .api_version(ApiVersion::V1_0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.tenant_id().as_ref(), "contoso.onmicrosoft.com");
//! ```
//!
//! ## Authentication
//!
//! ```rust,ignore
//! use msgraph_api::{ClientId, ClientSecret};
//! use msgraph_api::auth::acquire_token;
//!
//! let token = acquire_token(
//!     &config,
//!     &ClientId::new("00000000-0000-0000-0000-000000000000").unwrap(),
//!     &ClientSecret::new("secret").unwrap(),
//! )
//! .await?;
//! ```
//!
//! ## Conditional Access Policies
//!
//! ```rust,ignore
//! use msgraph_api::odata::Query;
//! use msgraph_api::resources::identity::ConditionalAccessPolicyClient;
//!
//! let client = ConditionalAccessPolicyClient::new(&token, &config)?;
//!
//! let enabled = client
//!     .list(&Query {
//!         filter: Some("state eq 'enabled'".to_string()),
//!         ..Query::default()
//!     })
//!     .await?;
//!
//! for policy in enabled.iter() {
//!     println!("{:?}", policy.display_name);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Status-aware errors**: Every transport error reports the HTTP status it saw

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod odata;
pub mod resources;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, AuthError};
pub use config::{
    ApiVersion, ClientId, ClientSecret, EndpointUrl, GraphConfig, GraphConfigBuilder, TenantId,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, GraphClient, GraphError, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, HttpResponseError, InvalidHttpRequestError,
    MaxHttpRetriesExceededError,
};

// Re-export resource types
pub use resources::identity::{ConditionalAccessPolicy, ConditionalAccessPolicyClient};
pub use resources::{GraphResource, ResourceError, ResourceResponse};
