//! OData conventions used by Microsoft Graph.
//!
//! This module provides:
//!
//! - [`Query`]: typed OData system query options (`$filter`, `$select`, ...)
//! - [`ODataError`]: the error envelope Graph returns on failed requests
//! - [`ODataCollection`]: the `value` / `@odata.nextLink` collection envelope
//!
//! # Example
//!
//! ```rust
//! use msgraph_api::odata::{ConsistencyLevel, Query};
//!
//! let query = Query {
//!     filter: Some("state eq 'enabled'".to_string()),
//!     select: vec!["id".to_string(), "displayName".to_string()],
//!     top: Some(10),
//!     consistency_level: Some(ConsistencyLevel::Eventual),
//!     ..Default::default()
//! };
//!
//! let params = query.values();
//! assert_eq!(params.get("$filter").map(String::as_str), Some("state eq 'enabled'"));
//! assert_eq!(params.get("$select").map(String::as_str), Some("id,displayName"));
//! assert_eq!(params.get("$top").map(String::as_str), Some("10"));
//! assert_eq!(query.headers().get("ConsistencyLevel").map(String::as_str), Some("eventual"));
//! ```

mod error;
mod query;

pub use error::{ODataError, ODataErrorDetail, ODataInnerError};
pub use query::{ConsistencyLevel, Expand, Format, OrderBy, OrderByDirection, Query};

use serde::{Deserialize, Serialize};

/// A page of a collection response.
///
/// Graph wraps every collection in `{"value": [...]}` and adds
/// `@odata.nextLink` when more pages are available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ODataCollection<T> {
    /// The entities in this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Absolute URL of the next page, if any.
    #[serde(
        rename = "@odata.nextLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_link: Option<String>,

    /// Total item count, present when `$count=true` was requested.
    #[serde(
        rename = "@odata.count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u64>,
}

impl<T> Default for ODataCollection<T> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            next_link: None,
            count: None,
        }
    }
}
