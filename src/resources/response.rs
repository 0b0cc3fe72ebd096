//! Response wrapper for Graph resource operations.
//!
//! [`ResourceResponse<T>`] pairs decoded data with the HTTP status and the
//! Graph request ID. It implements `Deref<Target = T>`:
//!
//! ```rust,ignore
//! let policies = client.list(&Query::default()).await?;
//!
//! for policy in policies.iter() {
//!     println!("{:?}", policy.display_name);
//! }
//! assert_eq!(policies.status(), 200);
//!
//! let policies: Vec<ConditionalAccessPolicy> = policies.into_inner();
//! ```

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::clients::HttpResponse;
use crate::odata::ODataCollection;
use crate::resources::ResourceError;

/// Decoded data from a resource operation plus response metadata.
///
/// # Example
///
/// ```rust
/// use msgraph_api::resources::ResourceResponse;
///
/// let response = ResourceResponse::new(vec!["a", "b"], 200, Some("req-1".to_string()));
/// assert_eq!(response.len(), 2);
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.request_id(), Some("req-1"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    data: T,
    /// HTTP status of the (first) response.
    status: u16,
    /// Graph `request-id` header.
    request_id: Option<String>,
    /// `@odata.count`, when requested with `$count=true`.
    count: Option<u64>,
}

impl<T> ResourceResponse<T> {
    #[must_use]
    pub const fn new(data: T, status: u16, request_id: Option<String>) -> Self {
        Self {
            data,
            status,
            request_id,
            count: None,
        }
    }

    /// Attaches an OData count.
    #[must_use]
    pub const fn with_count(mut self, count: Option<u64>) -> Self {
        self.count = count;
        self
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    #[must_use]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        self.count
    }

    /// Maps the inner data, keeping the metadata.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ResourceResponse<U> {
        ResourceResponse {
            data: f(self.data),
            status: self.status,
            request_id: self.request_id,
            count: self.count,
        }
    }
}

impl<T: DeserializeOwned> ResourceResponse<T> {
    /// Decodes a single entity from the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if the body does not match `T`.
    pub fn from_http_response(
        response: HttpResponse,
        resource: &'static str,
    ) -> Result<Self, ResourceError> {
        let request_id = response.request_id().map(String::from);
        let status = response.code;
        let data = serde_json::from_value(response.body).map_err(|source| {
            ResourceError::Deserialize {
                resource,
                status,
                source,
            }
        })?;

        Ok(Self::new(data, status, request_id))
    }
}

impl<T: DeserializeOwned> ResourceResponse<Vec<T>> {
    /// Decodes the `value` array of an OData collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if the body is not a collection of `T`.
    pub fn from_collection(
        response: HttpResponse,
        resource: &'static str,
    ) -> Result<Self, ResourceError> {
        let request_id = response.request_id().map(String::from);
        let header_count = response.odata_count();
        let status = response.code;
        let collection: ODataCollection<T> =
            serde_json::from_value(response.body).map_err(|source| {
                ResourceError::Deserialize {
                    resource,
                    status,
                    source,
                }
            })?;

        Ok(Self::new(collection.value, status, request_id)
            .with_count(collection.count.or(header_count)))
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

// Verify ResourceResponse is Send + Sync when T is
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceResponse<Vec<String>>>();
};
