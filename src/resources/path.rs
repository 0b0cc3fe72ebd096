//! Path templates for Graph resources.
//!
//! Each resource declares a [`ResourcePath`] per [`ResourceOperation`].
//! Templates use `{name}` placeholders, which [`build_path`] fills with
//! percent-encoded values.
//!
//! # Example
//!
//! ```rust
//! use msgraph_api::resources::{build_path, get_path, ResourceOperation, ResourcePath};
//! use msgraph_api::HttpMethod;
//! use std::collections::HashMap;
//!
//! const PATHS: &[ResourcePath] = &[
//!     ResourcePath::new(HttpMethod::Get, ResourceOperation::Get, &["id"], "groups/{id}"),
//!     ResourcePath::new(HttpMethod::Get, ResourceOperation::List, &[], "groups"),
//! ];
//!
//! let path = get_path(PATHS, ResourceOperation::Get, &["id"]).unwrap();
//!
//! let mut ids = HashMap::new();
//! ids.insert("id", "a b");
//! assert_eq!(build_path(path.template, &ids), "groups/a%20b");
//! ```

use std::collections::HashMap;
use std::fmt::Display;

use crate::clients::HttpMethod;

/// Operations that can be performed on a Graph resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// List the collection (GET /resources).
    List,
    /// Create a new entity (POST /resources).
    Create,
    /// Fetch a single entity (GET /resources/{id}).
    Get,
    /// Update an entity (PATCH /resources/{id}).
    Update,
    /// Delete an entity (DELETE /resources/{id}).
    Delete,
}

impl ResourceOperation {
    /// Returns the HTTP method for this operation.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self {
            Self::List | Self::Get => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Patch,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns the only status code Graph answers a successful call with.
    #[must_use]
    pub const fn expected_status(&self) -> u16 {
        match self {
            Self::List | Self::Get => 200,
            Self::Create => 201,
            Self::Update | Self::Delete => 204,
        }
    }

    /// Returns `true` if a 404 is retried as a possible replication delay.
    ///
    /// Only operations addressing an existing entity by ID can hit a
    /// replica that has not seen it yet.
    #[must_use]
    pub const fn uses_consistency_retry(&self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A path configuration for a Graph resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    /// The HTTP method for this path.
    pub http_method: HttpMethod,
    /// The operation this path is used for.
    pub operation: ResourceOperation,
    /// Required ID parameters in order (e.g., `["group_id", "id"]`).
    pub ids: &'static [&'static str],
    /// The entity path template with `{id}` placeholders.
    pub template: &'static str,
}

impl ResourcePath {
    /// Creates a new `ResourcePath`.
    #[must_use]
    pub const fn new(
        http_method: HttpMethod,
        operation: ResourceOperation,
        ids: &'static [&'static str],
        template: &'static str,
    ) -> Self {
        Self {
            http_method,
            operation,
            ids,
            template,
        }
    }

    /// Returns the number of required IDs for this path.
    #[must_use]
    pub const fn id_count(&self) -> usize {
        self.ids.len()
    }

    /// Checks if all required IDs are available.
    #[must_use]
    pub fn matches_ids(&self, available_ids: &[&str]) -> bool {
        self.ids.iter().all(|id| available_ids.contains(id))
    }
}

/// Selects the most specific path for an operation whose IDs are all available.
#[must_use]
pub fn get_path<'a>(
    paths: &'a [ResourcePath],
    operation: ResourceOperation,
    available_ids: &[&str],
) -> Option<&'a ResourcePath> {
    paths
        .iter()
        .filter(|p| p.operation == operation)
        .filter(|p| p.matches_ids(available_ids))
        .max_by_key(|p| p.id_count())
}

/// Fills `{name}` placeholders in a template with percent-encoded values.
///
/// # Example
///
/// ```rust
/// use msgraph_api::resources::build_path;
/// use std::collections::HashMap;
///
/// let mut ids = HashMap::new();
/// ids.insert("id", "0f1e/2d");
///
/// let path = build_path("identity/conditionalAccess/policies/{id}", &ids);
/// assert_eq!(path, "identity/conditionalAccess/policies/0f1e%2F2d");
/// ```
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_path<V: Display>(template: &str, ids: &HashMap<&str, V>) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        let encoded = urlencoding::encode(&value.to_string()).into_owned();
        result = result.replace(&placeholder, &encoded);
    }

    result
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceOperation>();
    assert_send_sync::<ResourcePath>();
};
