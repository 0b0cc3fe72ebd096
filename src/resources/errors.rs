//! Error types for Graph resource operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use msgraph_api::resources::ResourceError;
//!
//! match client.get("0f1e2d3c", &Query::default()).await {
//!     Ok(policy) => println!("Found: {:?}", policy.display_name),
//!     Err(e) if e.is_not_found() => println!("No such policy"),
//!     Err(e) => println!("Failed with status {:?}: {e}", e.status()),
//! }
//! ```

use crate::clients::{GraphError, HttpError};
use thiserror::Error;

/// Error type for Graph resource operations.
///
/// # Example
///
/// ```rust
/// use msgraph_api::resources::ResourceError;
///
/// let error = ResourceError::MissingId {
///     resource: "ConditionalAccessPolicy",
///     operation: "update",
/// };
/// assert_eq!(error.to_string(), "cannot update ConditionalAccessPolicy with nil ID");
/// assert_eq!(error.status(), None);
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The entity has no ID but the operation addresses it by ID.
    ///
    /// Raised before any request is sent.
    #[error("cannot {operation} {resource} with nil ID")]
    MissingId {
        /// The type name of the resource.
        resource: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// No path is declared for the operation and available IDs.
    #[error("Cannot resolve path for {resource}::{operation} with provided IDs")]
    PathResolutionFailed {
        /// The type name of the resource.
        resource: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// The entity could not be encoded as a request body.
    #[error("Failed to serialize {resource}: {source}")]
    Serialize {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The response body could not be decoded.
    #[error("Failed to deserialize {resource} response (status {status}): {source}")]
    Deserialize {
        resource: &'static str,
        /// Status of the response that failed to decode.
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A transport-level error occurred.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ResourceError {
    /// Returns the HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Deserialize { status, .. } => Some(*status),
            Self::Graph(e) => e.status(),
            _ => None,
        }
    }

    /// Returns `true` if the entity does not exist (HTTP 404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the Graph request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Graph(e) => e.request_id(),
            _ => None,
        }
    }
}

impl From<HttpError> for ResourceError {
    fn from(error: HttpError) -> Self {
        Self::Graph(GraphError::Http(error))
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    fn http_error(code: u16) -> HttpError {
        HttpError::Response(HttpResponseError {
            code,
            message: format!(r#"{{"status":{code}}}"#),
            error_reference: Some("req-42".to_string()),
            odata: None,
        })
    }

    #[test]
    fn test_missing_id_message() {
        let error = ResourceError::MissingId {
            resource: "ConditionalAccessPolicy",
            operation: "update",
        };
        assert_eq!(
            error.to_string(),
            "cannot update ConditionalAccessPolicy with nil ID"
        );
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_not_found_detected_from_status() {
        let error: ResourceError = http_error(404).into();
        assert!(error.is_not_found());
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.request_id(), Some("req-42"));
    }

    #[test]
    fn test_other_status_is_not_not_found() {
        let error: ResourceError = http_error(409).into();
        assert!(!error.is_not_found());
        assert_eq!(error.status(), Some(409));
    }

    #[test]
    fn test_deserialize_error_keeps_source() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let error = ResourceError::Deserialize {
            resource: "ConditionalAccessPolicy",
            status: 200,
            source,
        };
        assert!(error
            .to_string()
            .starts_with("Failed to deserialize ConditionalAccessPolicy response (status 200)"));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.status(), Some(200));
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_invalid_path_has_no_status() {
        let error = ResourceError::Graph(GraphError::InvalidPath {
            path: String::new(),
        });
        assert!(error.status().is_none());
        assert!(error.request_id().is_none());
    }
}
