//! Error types for the Graph base client.
//!
//! - [`GraphError::InvalidPath`]: An entity path failed validation
//! - [`GraphError::UntrustedNextLink`]: A collection page pointed off the Graph endpoint
//! - [`GraphError::InvalidPage`]: A follow-up collection page had no `value` array
//! - [`GraphError::Http`]: Wraps underlying HTTP errors
//!
//! # Example
//!
//! ```rust,ignore
//! use msgraph_api::clients::{GraphClient, GraphError, Uri, RequestOptions};
//!
//! match client.get(Uri::tenant("identity/conditionalAccess/policies"), RequestOptions::default()).await {
//!     Ok(response) => println!("Policies: {}", response.body),
//!     Err(GraphError::InvalidPath { path }) => println!("Invalid path: {path}"),
//!     Err(GraphError::Http(e)) => println!("HTTP error: {e}"),
//!     Err(e) => println!("Paging failed: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for Graph base client operations.
///
/// # Example
///
/// ```rust
/// use msgraph_api::clients::GraphError;
///
/// let error = GraphError::InvalidPath { path: "".to_string() };
/// assert!(error.to_string().contains("Invalid"));
/// assert_eq!(error.status(), None);
/// ```
#[derive(Debug, Error)]
pub enum GraphError {
    /// The entity path is empty after normalization.
    #[error("Invalid Graph entity path: '{path}'")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// An `@odata.nextLink` does not point at the configured endpoint.
    ///
    /// The link is not followed, so the access token never leaves the
    /// endpoint it was issued for.
    #[error("Refusing to follow @odata.nextLink outside the Graph endpoint: '{link}'")]
    UntrustedNextLink {
        /// The rejected link.
        link: String,
    },

    /// A follow-up collection page could not be read as a collection.
    #[error("Collection page at '{link}' (status {status}) has no value array")]
    InvalidPage {
        /// The page link.
        link: String,
        /// Status of the page response.
        status: u16,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl GraphError {
    /// Returns the HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidPath { .. } | Self::UntrustedNextLink { .. } => None,
            Self::InvalidPage { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
        }
    }

    /// Returns the Graph request ID of the failed response, if known.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http(e) => e.request_id(),
            _ => None,
        }
    }
}

// Verify GraphError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphError>();
};
