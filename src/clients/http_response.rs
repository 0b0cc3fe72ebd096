//! HTTP response types for the Microsoft Graph SDK.
//!
//! This module provides the [`HttpResponse`] type for accessing response data
//! and the Graph-specific headers and annotations that come with it.

use std::collections::HashMap;

/// Deprecation notice parsed from the `Deprecation` and `Sunset` headers.
///
/// Graph flags deprecated API surfaces with these headers; the SDK logs a
/// warning when it sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDeprecationInfo {
    /// Value of the `Deprecation` header.
    pub deprecation: String,
    /// Value of the `Sunset` header, if present.
    pub sunset: Option<String>,
}

/// A parsed response from Microsoft Graph.
///
/// # Example
///
/// ```rust
/// use msgraph_api::clients::HttpResponse;
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// let mut headers = HashMap::new();
/// headers.insert("request-id".to_string(), vec!["abc-123".to_string()]);
///
/// let response = HttpResponse::new(200, headers, json!({"value": []}));
/// assert!(response.is_ok());
/// assert_eq!(response.request_id(), Some("abc-123"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body (`{}` when the body was empty, a string when it
    /// was not JSON).
    pub body: serde_json::Value,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new response, parsing the retry header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the server-assigned request ID.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("request-id")
    }

    /// Returns the client request ID echoed back by the server.
    #[must_use]
    pub fn client_request_id(&self) -> Option<&str> {
        self.header("client-request-id")
    }

    /// Returns the `@odata.nextLink` annotation of a collection page.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.body
            .get("@odata.nextLink")
            .and_then(serde_json::Value::as_str)
    }

    /// Returns the `@odata.count` annotation of a collection page.
    #[must_use]
    pub fn odata_count(&self) -> Option<u64> {
        self.body
            .get("@odata.count")
            .and_then(serde_json::Value::as_u64)
    }

    /// Returns deprecation information when the API surface is deprecated.
    #[must_use]
    pub fn deprecation_info(&self) -> Option<ApiDeprecationInfo> {
        self.header("deprecation").map(|deprecation| ApiDeprecationInfo {
            deprecation: deprecation.to_string(),
            sunset: self.header("sunset").map(ToString::to_string),
        })
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.header("deprecation").is_some()
    }
}
