//! Base client for Microsoft Graph.
//!
//! This module provides the [`GraphClient`] type, the shared base every
//! endpoint client is built on. It resolves tenant-scoped [`Uri`]s, applies
//! per-call [`RequestOptions`] and follows `@odata.nextLink` paging.

use std::collections::HashMap;

use serde_json::Value;

use crate::auth::AccessToken;
use crate::clients::graph::GraphError;
use crate::clients::{
    ConsistencyFailureFunc, DataType, HttpClient, HttpMethod, HttpRequest, HttpResponse,
};
use crate::config::{ApiVersion, GraphConfig, TenantId};

/// The target of a Graph request.
///
/// # Example
///
/// ```rust
/// use msgraph_api::clients::Uri;
///
/// let uri = Uri::tenant("/identity/conditionalAccess/policies");
/// assert!(uri.has_tenant_id);
/// assert!(uri.params.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Uri {
    /// Entity path relative to the version root (e.g. `/users/{id}`).
    pub entity: String,
    /// Query parameters.
    pub params: Option<HashMap<String, String>>,
    /// Whether the tenant ID is inserted between the version and the entity.
    pub has_tenant_id: bool,
}

impl Uri {
    /// Creates a tenant-scoped URI.
    #[must_use]
    pub fn tenant(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            params: None,
            has_tenant_id: true,
        }
    }

    /// Creates a URI without the tenant segment.
    #[must_use]
    pub fn global(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            params: None,
            has_tenant_id: false,
        }
    }

    /// Sets the query parameters, dropping an empty map.
    #[must_use]
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = if params.is_empty() { None } else { Some(params) };
        self
    }
}

/// Per-call options for [`GraphClient`] requests.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Statuses accepted as success. Empty accepts any 2xx.
    pub valid_status_codes: Vec<u16>,
    /// Predicate deciding whether a rejected response is an eventual
    /// consistency failure worth retrying.
    pub consistency_failure: Option<ConsistencyFailureFunc>,
    /// Return only the first page of a collection.
    pub disable_paging: bool,
    /// Extra request headers (e.g. `ConsistencyLevel`).
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    /// Creates options accepting a single status code.
    #[must_use]
    pub fn expecting(status: u16) -> Self {
        Self {
            valid_status_codes: vec![status],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn consistency_failure(mut self, func: ConsistencyFailureFunc) -> Self {
        self.consistency_failure = Some(func);
        self
    }

    #[must_use]
    pub const fn disable_paging(mut self, disable: bool) -> Self {
        self.disable_paging = disable;
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Base client for Microsoft Graph.
///
/// Provides `get`, `post`, `patch` and `delete` against tenant-scoped
/// entity paths, with valid-status checking and consistency retries.
///
/// # Thread Safety
///
/// `GraphClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use msgraph_api::{AccessToken, ApiVersion, GraphConfig, TenantId};
/// use msgraph_api::clients::{GraphClient, RequestOptions, Uri};
///
/// let config = GraphConfig::builder()
///     .tenant_id(TenantId::new("contoso").unwrap())
///     .build()?;
/// let client = GraphClient::with_version(&AccessToken::new("token"), &config, ApiVersion::Beta)?;
///
/// let response = client
///     .get(Uri::tenant("/identity/conditionalAccess/policies"), RequestOptions::expecting(200))
///     .await?;
/// ```
#[derive(Debug)]
pub struct GraphClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
    /// The API version being used.
    api_version: ApiVersion,
    tenant_id: TenantId,
    /// Transient retry budget applied to every request.
    tries: u32,
}

// Verify GraphClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphClient>();
};

impl GraphClient {
    /// Creates a client using the API version from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the HTTP client cannot be initialized.
    pub fn new(token: &AccessToken, config: &GraphConfig) -> Result<Self, GraphError> {
        Self::create_client(token, config, config.api_version())
    }

    /// Creates a client with an API version override.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the HTTP client cannot be initialized.
    pub fn with_version(
        token: &AccessToken,
        config: &GraphConfig,
        version: ApiVersion,
    ) -> Result<Self, GraphError> {
        let config_version = config.api_version();
        if version == config_version {
            tracing::debug!(
                "Graph client has a redundant API version override to the default {}",
                config_version
            );
        } else {
            tracing::debug!(
                "Graph client overriding default API version {} with {}",
                config_version,
                version
            );
        }

        Self::create_client(token, config, version)
    }

    fn create_client(
        token: &AccessToken,
        config: &GraphConfig,
        api_version: ApiVersion,
    ) -> Result<Self, GraphError> {
        if token.expired() {
            tracing::warn!("Creating a Graph client with an expired access token");
        }

        // Base path: /{version}
        let base_path = format!("/{api_version}");
        let http_client = HttpClient::new(base_path, token, config)?;

        Ok(Self {
            http_client,
            api_version,
            tenant_id: config.tenant_id().clone(),
            tries: config.tries(),
        })
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the tenant this client is bound to.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request.
    ///
    /// Collections are followed through `@odata.nextLink` and their `value`
    /// arrays concatenated into the first response, unless
    /// [`RequestOptions::disable_paging`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] if the entity path is empty.
    /// Returns [`GraphError::Http`] for HTTP-level errors on any page.
    /// Returns [`GraphError::UntrustedNextLink`] if a next link leaves the endpoint.
    /// Returns [`GraphError::InvalidPage`] if a follow-up page is not a collection.
    pub async fn get(&self, uri: Uri, options: RequestOptions) -> Result<HttpResponse, GraphError> {
        let mut response = self
            .make_request(HttpMethod::Get, &uri, None, &options)
            .await?;

        if options.disable_paging {
            return Ok(response);
        }

        let mut next_link = response.next_link().map(String::from);
        if next_link.is_none() {
            return Ok(response);
        }

        let mut values = match response.body.get_mut("value").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Ok(response),
        };

        while let Some(link) = next_link {
            tracing::debug!(next_link = %link, "Following Graph collection page");
            let page = self.follow_link(&link, &options).await?;
            match page.body.get("value") {
                Some(Value::Array(items)) => values.extend(items.iter().cloned()),
                _ => {
                    return Err(GraphError::InvalidPage {
                        link,
                        status: page.code,
                    })
                }
            }
            next_link = page.next_link().map(String::from);
        }

        if let Some(body) = response.body.as_object_mut() {
            body.insert("value".to_string(), Value::Array(values));
            body.remove("@odata.nextLink");
        }

        Ok(response)
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] if the entity path is empty.
    /// Returns [`GraphError::Http`] for HTTP-level errors.
    pub async fn post(
        &self,
        uri: Uri,
        body: Value,
        options: RequestOptions,
    ) -> Result<HttpResponse, GraphError> {
        self.make_request(HttpMethod::Post, &uri, Some(body), &options)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] if the entity path is empty.
    /// Returns [`GraphError::Http`] for HTTP-level errors.
    pub async fn patch(
        &self,
        uri: Uri,
        body: Value,
        options: RequestOptions,
    ) -> Result<HttpResponse, GraphError> {
        self.make_request(HttpMethod::Patch, &uri, Some(body), &options)
            .await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] if the entity path is empty.
    /// Returns [`GraphError::Http`] for HTTP-level errors.
    pub async fn delete(&self, uri: Uri, options: RequestOptions) -> Result<HttpResponse, GraphError> {
        self.make_request(HttpMethod::Delete, &uri, None, &options)
            .await
    }

    /// Resolves a [`Uri`] to the path sent below the version root.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPath`] if the entity path is empty.
    pub fn build_path(&self, uri: &Uri) -> Result<String, GraphError> {
        let entity = normalize_entity(&uri.entity)?;
        if uri.has_tenant_id {
            Ok(format!("{}/{entity}", self.tenant_id))
        } else {
            Ok(entity.to_string())
        }
    }

    /// Internal helper to build and send requests.
    async fn make_request(
        &self,
        method: HttpMethod,
        uri: &Uri,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<HttpResponse, GraphError> {
        let path = self.build_path(uri)?;

        let mut builder = HttpRequest::builder(method, path)
            .tries(self.tries)
            .valid_status_codes(options.valid_status_codes.clone());

        if let Some(body_value) = body {
            builder = builder.body(body_value).body_type(DataType::Json);
        }

        if let Some(params) = &uri.params {
            builder = builder.query(params.clone());
        }

        if !options.headers.is_empty() {
            builder = builder.extra_headers(options.headers.clone());
        }

        if let Some(func) = options.consistency_failure {
            builder = builder.consistency_failure(func);
        }

        let request = builder.build().map_err(|e| GraphError::Http(e.into()))?;

        self.http_client.request(request).await.map_err(Into::into)
    }

    /// Fetches a follow-up page; the link already carries the query string.
    ///
    /// Only links on the client's own endpoint are followed.
    async fn follow_link(
        &self,
        link: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, GraphError> {
        if !is_same_origin(link, self.http_client.base_uri()) {
            tracing::warn!(next_link = %link, "Ignoring @odata.nextLink outside the Graph endpoint");
            return Err(GraphError::UntrustedNextLink {
                link: link.to_string(),
            });
        }

        let mut builder = HttpRequest::builder(HttpMethod::Get, link)
            .tries(self.tries)
            .valid_status_codes(options.valid_status_codes.clone());

        if !options.headers.is_empty() {
            builder = builder.extra_headers(options.headers.clone());
        }

        let request = builder.build().map_err(|e| GraphError::Http(e.into()))?;

        self.http_client.request(request).await.map_err(Into::into)
    }
}

/// Returns `true` when `link` is an absolute URL under `base_uri`.
fn is_same_origin(link: &str, base_uri: &str) -> bool {
    let Some(rest) = link.get(..base_uri.len()) else {
        return false;
    };
    rest.eq_ignore_ascii_case(base_uri)
        && matches!(link.as_bytes().get(base_uri.len()), None | Some(b'/' | b'?'))
}

/// Strips leading `/` characters from an entity path.
fn normalize_entity(entity: &str) -> Result<&str, GraphError> {
    let trimmed = entity.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(GraphError::InvalidPath {
            path: entity.to_string(),
        });
    }
    Ok(trimmed)
}
