//! Graph resource trait for CRUD operations.
//!
//! This module defines the [`GraphResource`] trait. Entity types implementing
//! it get `list()`, `create()`, `get()`, `update()` and `delete()` against a
//! [`GraphClient`], each sending one request (plus paging and consistency
//! retries) and decoding the JSON response.
//!
//! # Implementing a Resource
//!
//! ```rust,ignore
//! use msgraph_api::resources::{GraphResource, ResourceOperation, ResourcePath};
//! use msgraph_api::{ApiVersion, HttpMethod};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct NamedLocation {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
//!     pub display_name: Option<String>,
//! }
//!
//! impl GraphResource for NamedLocation {
//!     const NAME: &'static str = "NamedLocation";
//!     const API_VERSION: ApiVersion = ApiVersion::Beta;
//!     const PATHS: &'static [ResourcePath] = &[
//!         ResourcePath::new(HttpMethod::Get, ResourceOperation::List, &[], "identity/conditionalAccess/namedLocations"),
//!         ResourcePath::new(HttpMethod::Get, ResourceOperation::Get, &["id"], "identity/conditionalAccess/namedLocations/{id}"),
//!     ];
//!
//!     fn get_id(&self) -> Option<&str> {
//!         self.id.as_deref()
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::clients::{retry_on_404_consistency_failure, GraphClient, RequestOptions, Uri};
use crate::config::ApiVersion;
use crate::odata::Query;
use crate::resources::{build_path, get_path, ResourceError, ResourceOperation, ResourcePath, ResourceResponse};

/// A Graph entity that can be listed, created, fetched, updated and deleted.
///
/// # Associated Constants
///
/// - `NAME`: The entity type name used in errors (e.g., `"ConditionalAccessPolicy"`)
/// - `API_VERSION`: The Graph version the entity is served from
/// - `PATHS`: Entity path templates per operation
/// - `TENANT_SCOPED`: Whether paths are prefixed with the tenant ID
///
/// # Status codes
///
/// Each operation accepts exactly one status (see
/// [`ResourceOperation::expected_status`]); any other status is an error.
#[allow(async_fn_in_trait)]
pub trait GraphResource: Serialize + DeserializeOwned + Clone + Send + Sync + Sized {
    /// The entity type name.
    const NAME: &'static str;

    /// The API version clients for this entity bind to.
    const API_VERSION: ApiVersion = ApiVersion::V1_0;

    /// Available paths for this entity.
    const PATHS: &'static [ResourcePath];

    /// Whether requests are scoped to the configured tenant.
    const TENANT_SCOPED: bool = true;

    /// Returns the entity's ID if it has one.
    fn get_id(&self) -> Option<&str>;

    /// Lists the collection, following `@odata.nextLink` unless `query.top` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Graph`] for transport errors or a status other
    /// than 200, and [`ResourceError::Deserialize`] for an undecodable body.
    async fn list(
        client: &GraphClient,
        query: &Query,
    ) -> Result<ResourceResponse<Vec<Self>>, ResourceError> {
        let uri = resource_uri::<Self>(ResourceOperation::List, None)?.with_params(query.values());
        let options = request_options(ResourceOperation::List, Some(query));

        let response = client.get(uri, options).await?;

        ResourceResponse::from_collection(response, Self::NAME)
    }

    /// Creates the entity, returning the server's representation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Serialize`] if the entity cannot be encoded,
    /// [`ResourceError::Graph`] for transport errors or a status other than 201.
    async fn create(&self, client: &GraphClient) -> Result<ResourceResponse<Self>, ResourceError> {
        let uri = resource_uri::<Self>(ResourceOperation::Create, None)?;
        let body = serde_json::to_value(self).map_err(|source| ResourceError::Serialize {
            resource: Self::NAME,
            source,
        })?;

        let response = client
            .post(uri, body, request_options(ResourceOperation::Create, None))
            .await?;

        ResourceResponse::from_http_response(response, Self::NAME)
    }

    /// Fetches a single entity by ID.
    ///
    /// A 404 is retried as a possible replication delay before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Graph`] for transport errors or a status other
    /// than 200, and [`ResourceError::Deserialize`] for an undecodable body.
    async fn get(
        client: &GraphClient,
        id: &str,
        query: &Query,
    ) -> Result<ResourceResponse<Self>, ResourceError> {
        let uri = resource_uri::<Self>(ResourceOperation::Get, Some(id))?.with_params(query.values());
        let options = request_options(ResourceOperation::Get, Some(query));

        let response = client.get(uri, options).await?;

        ResourceResponse::from_http_response(response, Self::NAME)
    }

    /// Updates the entity in place, returning the response status (204).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without sending anything when the
    /// entity has no ID, [`ResourceError::Graph`] for transport errors or a
    /// status other than 204.
    async fn update(&self, client: &GraphClient) -> Result<u16, ResourceError> {
        let id = self
            .get_id()
            .filter(|id| !id.is_empty())
            .ok_or(ResourceError::MissingId {
                resource: Self::NAME,
                operation: ResourceOperation::Update.as_str(),
            })?;

        let uri = resource_uri::<Self>(ResourceOperation::Update, Some(id))?;
        let body = serde_json::to_value(self).map_err(|source| ResourceError::Serialize {
            resource: Self::NAME,
            source,
        })?;

        let response = client
            .patch(uri, body, request_options(ResourceOperation::Update, None))
            .await?;

        Ok(response.code)
    }

    /// Deletes the entity with the given ID, returning the response status (204).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an empty ID,
    /// [`ResourceError::Graph`] for transport errors or a status other than 204.
    async fn delete(client: &GraphClient, id: &str) -> Result<u16, ResourceError> {
        if id.is_empty() {
            return Err(ResourceError::MissingId {
                resource: Self::NAME,
                operation: ResourceOperation::Delete.as_str(),
            });
        }

        let uri = resource_uri::<Self>(ResourceOperation::Delete, Some(id))?;

        let response = client
            .delete(uri, request_options(ResourceOperation::Delete, None))
            .await?;

        Ok(response.code)
    }
}

/// Resolves the entity path for an operation.
fn resource_uri<R: GraphResource>(
    operation: ResourceOperation,
    id: Option<&str>,
) -> Result<Uri, ResourceError> {
    let mut ids: HashMap<&str, &str> = HashMap::new();
    if let Some(id) = id {
        ids.insert("id", id);
    }

    let available_ids: Vec<&str> = ids.keys().copied().collect();
    let path = get_path(R::PATHS, operation, &available_ids).ok_or(
        ResourceError::PathResolutionFailed {
            resource: R::NAME,
            operation: operation.as_str(),
        },
    )?;

    let entity = build_path(path.template, &ids);
    if R::TENANT_SCOPED {
        Ok(Uri::tenant(entity))
    } else {
        Ok(Uri::global(entity))
    }
}

/// Builds the options for an operation: its expected status, the 404
/// consistency check where applicable, and query-implied headers and paging.
fn request_options(operation: ResourceOperation, query: Option<&Query>) -> RequestOptions {
    let mut options = RequestOptions::expecting(operation.expected_status());

    if operation.uses_consistency_retry() {
        options = options.consistency_failure(retry_on_404_consistency_failure);
    }

    if let Some(query) = query {
        options = options
            .headers(query.headers())
            .disable_paging(query.disables_paging());
    }

    options
}
