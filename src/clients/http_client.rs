//! HTTP client for Microsoft Graph communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to Microsoft Graph with automatic retry handling.

use std::collections::HashMap;
use std::time::Duration;

use uuid::Uuid;

use crate::auth::AccessToken;
use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::GraphConfig;
use crate::odata::ODataError;

/// Fixed retry wait time in seconds for transient failures.
pub const RETRY_WAIT_TIME: u64 = 1;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to Microsoft Graph.
///
/// The client handles:
/// - Base URI construction from the configured endpoint
/// - Default headers including User-Agent and the bearer token
/// - A fresh `client-request-id` per logical request
/// - Automatic retries for 429 and 5xx responses
/// - Consistency retries driven by the request's consistency-failure check
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use msgraph_api::{AccessToken, GraphConfig, TenantId};
/// use msgraph_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = GraphConfig::builder()
///     .tenant_id(TenantId::new("contoso").unwrap())
///     .build()?;
/// let client = HttpClient::new("/v1.0", &AccessToken::new("token"), &config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "organization").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://graph.microsoft.com`).
    base_uri: String,
    /// Base path (e.g., "/beta").
    base_path: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    consistency_retries: u32,
    consistency_retry_delay: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The base path for API requests (e.g., "/beta")
    /// * `token` - The bearer token sent with every request
    /// * `config` - Endpoint, user agent and consistency retry settings
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new(
        base_path: impl Into<String>,
        token: &AccessToken,
        config: &GraphConfig,
    ) -> Result<Self, HttpError> {
        let base_path = base_path.into();
        let base_uri = config.endpoint().as_ref().to_string();

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Microsoft Graph Rust SDK v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if !token.token.is_empty() {
            default_headers.insert(
                "Authorization".to_string(),
                format!("{} {}", token.token_type, token.token),
            );
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri,
            base_path,
            default_headers,
            consistency_retries: config.consistency_retries(),
            consistency_retry_delay: config.consistency_retry_delay(),
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full URL a request will be sent to (without query string).
    #[must_use]
    pub fn url_for(&self, request: &HttpRequest) -> String {
        if request.is_absolute() {
            request.path.clone()
        } else {
            format!("{}{}/{}", self.base_uri, self.base_path, request.path)
        }
    }

    /// Sends an HTTP request to Microsoft Graph.
    ///
    /// The request is attempted until its status is accepted, its
    /// consistency-failure check stops asking for retries, or the transient
    /// retry budget (`tries`) is used up.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - The response status is not accepted (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request);

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        headers.insert("client-request-id".to_string(), new_client_request_id());
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut tries: u32 = 1;
        let mut consistency_attempts: u32 = 0;
        loop {
            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Patch => self.client.patch(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            tracing::debug!(method = %request.http_method, url = %url, "Sending Graph request");

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await?;

            // Bodies that are not JSON are kept verbatim as a string value
            let body = if body_text.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text)
                    .unwrap_or_else(|_| serde_json::Value::String(body_text))
            };

            let response = HttpResponse::new(code, res_headers, body);

            if let Some(info) = response.deprecation_info() {
                tracing::warn!(
                    "Deprecated Graph API request to {}, deprecation: {}, sunset: {}",
                    request.path,
                    info.deprecation,
                    info.sunset.as_deref().unwrap_or("unknown")
                );
            }

            if request.accepts(code) {
                return Ok(response);
            }

            if let Some(is_consistency_failure) = request.consistency_failure {
                if consistency_attempts < self.consistency_retries
                    && is_consistency_failure(&response)
                {
                    consistency_attempts += 1;
                    tracing::warn!(
                        "Possible eventual consistency failure for {} {} (status {}), retry {} of {}",
                        request.http_method,
                        request.path,
                        code,
                        consistency_attempts,
                        self.consistency_retries
                    );
                    tokio::time::sleep(self.consistency_retry_delay).await;
                    continue;
                }
            }

            let (error_message, odata) = Self::serialize_error(&response);
            let error_reference = response
                .request_id()
                .or_else(|| odata.as_ref().and_then(ODataError::request_id))
                .map(String::from);

            let should_retry = matches!(code, 429 | 500 | 502 | 503 | 504);
            if !should_retry {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message: error_message,
                    error_reference,
                    odata,
                }));
            }

            if tries >= request.tries {
                if request.tries <= 1 {
                    return Err(HttpError::Response(HttpResponseError {
                        code,
                        message: error_message,
                        error_reference,
                        odata,
                    }));
                }
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message: error_message,
                    error_reference,
                }));
            }

            tries += 1;
            let delay = Self::calculate_retry_delay(&response, code);
            tracing::debug!(
                "Retrying {} {} after status {} in {:?}",
                request.http_method,
                request.path,
                code,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses response headers into a `HashMap` keyed by lowercase name.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        // Throttling responses say how long to back off; server errors use the fixed delay
        if status == 429 || status == 503 {
            if let Some(retry_after) = response.retry_request_after.filter(|s| *s >= 0.0) {
                return Duration::from_secs_f64(retry_after);
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }

    /// Serializes an error response to a compact JSON message.
    fn serialize_error(response: &HttpResponse) -> (String, Option<ODataError>) {
        let odata = ODataError::from_body(&response.body);
        let mut error_body = serde_json::Map::new();

        error_body.insert("status".to_string(), serde_json::json!(response.code));

        if let Some(error) = &odata {
            if let Some(code) = &error.code {
                error_body.insert("code".to_string(), serde_json::json!(code));
            }
            if let Some(message) = &error.message {
                error_body.insert("message".to_string(), serde_json::json!(message));
            }
        } else if let Some(raw_body) = response.body.as_str() {
            error_body.insert("message".to_string(), serde_json::json!(raw_body));
        }

        let request_id = response
            .request_id()
            .or_else(|| odata.as_ref().and_then(ODataError::request_id));
        if let Some(request_id) = request_id {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        let message = serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string());
        (message, odata)
    }
}

/// Generates a random (version 4) client request ID.
fn new_client_request_id() -> String {
    Uuid::new_v4().to_string()
}
