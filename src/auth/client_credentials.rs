//! OAuth 2.0 client credentials grant against the Microsoft identity platform.
//!
//! Daemon applications authenticate as themselves (app-only access) by
//! presenting their client ID and secret to the tenant's token endpoint:
//!
//! ```text
//! POST {authority}/{tenant}/oauth2/v2.0/token
//! client_id=...&client_secret=...&grant_type=client_credentials&scope={graph}/.default
//! ```
//!
//! The `.default` scope grants every application permission the app was
//! consented for (for conditional access: `Policy.Read.All` and
//! `Policy.ReadWrite.ConditionalAccess`).
//!
//! # Example
//!
//! ```rust,ignore
//! use msgraph_api::{GraphConfig, TenantId, ClientId, ClientSecret};
//! use msgraph_api::auth::acquire_token;
//!
//! let config = GraphConfig::builder()
//!     .tenant_id(TenantId::new("contoso.onmicrosoft.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let token = acquire_token(
//!     &config,
//!     &ClientId::new("app-id").unwrap(),
//!     &ClientSecret::new("secret").unwrap(),
//! )
//! .await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::auth::{AccessToken, AuthError};
use crate::config::{ClientId, ClientSecret, GraphConfig};

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// Form body for the token request.
#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    scope: &'a str,
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Failed token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Returns the token endpoint for the configured tenant.
#[must_use]
pub fn token_url(config: &GraphConfig) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        config.authority(),
        config.tenant_id()
    )
}

/// Returns the `.default` scope for the configured Graph endpoint.
#[must_use]
pub fn default_scope(config: &GraphConfig) -> String {
    format!("{}/.default", config.endpoint())
}

/// Exchanges client credentials for an app-only access token.
///
/// # Errors
///
/// Returns [`AuthError::TokenRequestFailed`] if the request cannot be sent,
/// the identity platform rejects it, or the response cannot be parsed.
pub async fn acquire_token(
    config: &GraphConfig,
    client_id: &ClientId,
    client_secret: &ClientSecret,
) -> Result<AccessToken, AuthError> {
    let url = token_url(config);
    let scope = default_scope(config);

    let request_body = ClientCredentialsRequest {
        client_id: client_id.as_ref(),
        client_secret: client_secret.as_ref(),
        grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
        scope: &scope,
    };

    tracing::debug!(tenant = %config.tenant_id(), "Requesting app-only access token");

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .form(&request_body)
        .send()
        .await
        .map_err(|e| AuthError::TokenRequestFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<TokenErrorResponse>(&error_body).map_or(
            error_body,
            |e| match e.error_description {
                Some(description) => format!("{}: {description}", e.error),
                None => e.error,
            },
        );
        return Err(AuthError::TokenRequestFailed { status, message });
    }

    let token_response: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| AuthError::TokenRequestFailed {
                status,
                message: format!("Failed to parse token response: {e}"),
            })?;

    let TokenResponse {
        access_token,
        token_type,
        expires_in,
    } = token_response;

    let mut token = match expires_in {
        Some(seconds) => AccessToken::expiring_in(access_token, seconds),
        None => AccessToken::new(access_token),
    };
    if let Some(token_type) = token_type {
        token.token_type = token_type;
    }

    Ok(token)
}
