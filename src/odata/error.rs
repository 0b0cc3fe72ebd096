//! The OData error envelope returned by Microsoft Graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An error returned in the body of a failed Graph request.
///
/// Graph responds with:
///
/// ```json
/// {
///   "error": {
///     "code": "Request_ResourceNotFound",
///     "message": "Resource 'abc' does not exist ...",
///     "innerError": {"date": "...", "request-id": "...", "client-request-id": "..."}
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ODataError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ODataErrorDetail>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<ODataInnerError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ODataErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Diagnostic identifiers attached to an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ODataInnerError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(
        rename = "request-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,

    #[serde(
        rename = "client-request-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_request_id: Option<String>,
}

impl ODataError {
    /// Extracts the error from a response body, if it has one.
    ///
    /// Returns `None` when the body has no `error` object.
    #[must_use]
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let error = body.get("error")?;
        if !error.is_object() {
            return None;
        }
        serde_json::from_value(error.clone()).ok()
    }

    /// Returns `true` when the error code matches, ignoring case.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(code))
    }

    /// Returns the request ID from the inner error, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.inner_error
            .as_ref()
            .and_then(|inner| inner.request_id.as_deref())
    }
}

impl fmt::Display for ODataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown OData error"),
        }
    }
}
