//! HTTP client types for Microsoft Graph communication.
//!
//! This module provides the foundational HTTP layer for making authenticated
//! requests to Microsoft Graph. It handles request/response processing,
//! transient retries and eventual-consistency retries.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`GraphClient`]: Tenant-scoped base client with paging
//! - [`GraphError`]: Base client error type
//!
//! # Retry Behavior
//!
//! - **429 / 503**: Retries using the `Retry-After` header value, or 1 second if not present
//! - **500 / 502 / 504**: Retries with a fixed 1-second delay
//! - **Other errors (4xx)**: Returns immediately, unless the request's
//!   consistency-failure check asks for a retry
//!
//! The default `tries` is 1, meaning no transient retries. Consistency
//! retries are counted separately (see
//! [`GraphConfig::consistency_retries`](crate::GraphConfig::consistency_retries)).

mod errors;
pub mod graph;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{
    retry_on_404_consistency_failure, ConsistencyFailureFunc, DataType, HttpMethod, HttpRequest,
    HttpRequestBuilder,
};
pub use http_response::{ApiDeprecationInfo, HttpResponse};

pub use graph::{GraphClient, GraphError, RequestOptions, Uri};
